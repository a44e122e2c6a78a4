//! Connection-point grammar declared by catalog shapes.
//!
//! A shape lists, per direction, which neighbouring shapes it may abut.
//! Matchers never reference a category: `*` accepts anything, `bucket.*` (or a
//! bare `bucket`) accepts any shape in that angle bucket, and `bucket.name`
//! accepts exactly one shape.

use serde::{Deserialize, Serialize};

use crate::geometry::{Direction, OrientationParseError};
use crate::AngleBucket;

/// Accepts or refuses a neighbouring shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeMatcher {
    Any,
    Bucket(AngleBucket),
    Exact { bucket: AngleBucket, name: String },
}

impl ShapeMatcher {
    pub fn accepts(&self, bucket: &AngleBucket, name: &str) -> bool {
        match self {
            ShapeMatcher::Any => true,
            ShapeMatcher::Bucket(b) => b == bucket,
            ShapeMatcher::Exact { bucket: b, name: n } => b == bucket && n == name,
        }
    }
}

impl std::fmt::Display for ShapeMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeMatcher::Any => f.write_str("*"),
            ShapeMatcher::Bucket(b) => write!(f, "{b}.*"),
            ShapeMatcher::Exact { bucket, name } => write!(f, "{bucket}.{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherParseError {
    #[error("empty matcher")]
    Empty,
    #[error("invalid direction in connection point '{entry}': {source}")]
    Direction {
        entry: String,
        source: OrientationParseError,
    },
}

impl std::str::FromStr for ShapeMatcher {
    type Err = MatcherParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MatcherParseError::Empty);
        }
        if s == "*" {
            return Ok(ShapeMatcher::Any);
        }
        // Buckets may carry a decimal point (`22.5°`), so the name is split off
        // at the last dot
        match s.rsplit_once('.') {
            Some((bucket, "*")) | Some((bucket, "")) => Ok(ShapeMatcher::Bucket(AngleBucket::from(bucket))),
            Some((head, tail)) if is_decimal_point(head, tail) => Ok(ShapeMatcher::Bucket(AngleBucket::from(s))),
            Some((bucket, name)) => Ok(ShapeMatcher::Exact {
                bucket: AngleBucket::from(bucket),
                name: name.to_string(),
            }),
            None => Ok(ShapeMatcher::Bucket(AngleBucket::from(s))),
        }
    }
}

/// A dot between two digits belongs to the bucket, not the name separator
fn is_decimal_point(head: &str, tail: &str) -> bool {
    head.ends_with(|c: char| c.is_ascii_digit()) && tail.starts_with(|c: char| c.is_ascii_digit())
}

impl Serialize for ShapeMatcher {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeMatcher {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Permission for one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    pub direction: Direction,
    #[serde(alias = "allowed_shapes", alias = "allowedShapes")]
    pub allowed: Vec<ShapeMatcher>,
}

impl ConnectionPoint {
    pub fn accepts(&self, bucket: &AngleBucket, name: &str) -> bool {
        self.allowed.iter().any(|m| m.accepts(bucket, name))
    }
}

/// All connection points declared by a shape
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ConnectionPoints(pub Vec<ConnectionPoint>);

impl ConnectionPoints {
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Points declared towards `direction`
    pub fn towards(&self, direction: Direction) -> impl Iterator<Item = &ConnectionPoint> {
        self.0.iter().filter(move |p| p.direction == direction)
    }

    /// True when some point towards `direction` accepts the given shape
    pub fn allows(&self, direction: Direction, bucket: &AngleBucket, name: &str) -> bool {
        self.towards(direction).any(|p| p.accepts(bucket, name))
    }

    /// Parse the compact catalog form.
    ///
    /// Entries are separated by `,` or `;`. Each entry starts with direction
    /// tokens (`top`, `bottom left`, `right center`, ...) followed by matchers
    /// separated by whitespace or `|`. An entry without matchers accepts
    /// anything in that direction.
    pub fn parse(source: &str) -> Result<Self, MatcherParseError> {
        let mut points = Vec::new();

        for entry in source.split([',', ';']).map(str::trim).filter(|e| !e.is_empty()) {
            let tokens: Vec<&str> = entry
                .split(|c: char| c.is_whitespace() || c == '|')
                .filter(|t| !t.is_empty())
                .collect();

            let split = tokens
                .iter()
                .position(|t| !is_direction_token(t))
                .unwrap_or(tokens.len());
            let (direction_tokens, matcher_tokens) = tokens.split_at(split);

            let direction: Direction =
                direction_tokens
                    .join(" ")
                    .parse()
                    .map_err(|source| MatcherParseError::Direction {
                        entry: entry.to_string(),
                        source,
                    })?;

            let allowed = if matcher_tokens.is_empty() {
                vec![ShapeMatcher::Any]
            } else {
                matcher_tokens
                    .iter()
                    .map(|t| t.parse())
                    .collect::<Result<Vec<_>, _>>()?
            };

            points.push(ConnectionPoint { direction, allowed });
        }

        Ok(ConnectionPoints(points))
    }
}

fn is_direction_token(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "top" | "bottom" | "left" | "right" | "center" | "centre" | "middle"
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConnectionPointsRepr {
    Compact(String),
    List(Vec<ConnectionPoint>),
}

impl<'de> Deserialize<'de> for ConnectionPoints {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<ConnectionPointsRepr>::deserialize(deserializer)? {
            None => Ok(ConnectionPoints::default()),
            Some(ConnectionPointsRepr::Compact(s)) => {
                ConnectionPoints::parse(&s).map_err(serde::de::Error::custom)
            }
            Some(ConnectionPointsRepr::List(list)) => Ok(ConnectionPoints(list)),
        }
    }
}
