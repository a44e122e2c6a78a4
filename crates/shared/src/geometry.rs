//! Directions and in-cell anchoring.

use serde::{Deserialize, Serialize};

/// One of the 8 compass directions between grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::TopLeft,
        Direction::Top,
        Direction::TopRight,
        Direction::Left,
        Direction::Right,
        Direction::BottomLeft,
        Direction::Bottom,
        Direction::BottomRight,
    ];

    /// Fixed opposite lookup; diagonals swap both axes
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::TopLeft => Direction::BottomRight,
            Direction::TopRight => Direction::BottomLeft,
            Direction::BottomLeft => Direction::TopRight,
            Direction::BottomRight => Direction::TopLeft,
        }
    }

    /// (row, col) step towards the neighbour in this direction
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Top => (-1, 0),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::TopLeft => (-1, -1),
            Direction::TopRight => (-1, 1),
            Direction::BottomLeft => (1, -1),
            Direction::BottomRight => (1, 1),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        let (dr, dc) = self.delta();
        dr != 0 && dc != 0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::TopLeft => "top left",
            Direction::TopRight => "top right",
            Direction::BottomLeft => "bottom left",
            Direction::BottomRight => "bottom right",
        }
    }

    /// Build a direction from its vertical and horizontal components.
    ///
    /// `None` for the (center, center) pair, which names no neighbour.
    pub fn from_components(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Option<Self> {
        match (vertical, horizontal) {
            (VerticalAnchor::Top, HorizontalAnchor::Center) => Some(Direction::Top),
            (VerticalAnchor::Bottom, HorizontalAnchor::Center) => Some(Direction::Bottom),
            (VerticalAnchor::Center, HorizontalAnchor::Left) => Some(Direction::Left),
            (VerticalAnchor::Center, HorizontalAnchor::Right) => Some(Direction::Right),
            (VerticalAnchor::Top, HorizontalAnchor::Left) => Some(Direction::TopLeft),
            (VerticalAnchor::Top, HorizontalAnchor::Right) => Some(Direction::TopRight),
            (VerticalAnchor::Bottom, HorizontalAnchor::Left) => Some(Direction::BottomLeft),
            (VerticalAnchor::Bottom, HorizontalAnchor::Right) => Some(Direction::BottomRight),
            (VerticalAnchor::Center, HorizontalAnchor::Center) => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = OrientationParseError;

    /// Parses `top`, `bottom left`, `right center`, `left-top`, ...
    /// `center` tokens are ignored next to a side token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let orientation: CellOrientation = s.parse()?;
        Direction::from_components(orientation.vertical, orientation.horizontal)
            .ok_or_else(|| OrientationParseError::NoDirection(s.to_string()))
    }
}

impl TryFrom<String> for Direction {
    type Error = OrientationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrientationParseError {
    #[error("unknown orientation token '{0}'")]
    UnknownToken(String),
    #[error("conflicting orientation tokens in '{0}'")]
    Conflict(String),
    #[error("'{0}' does not name a direction")]
    NoDirection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAnchor {
    /// -1 for top, 0 for center, 1 for bottom
    pub fn sign(&self) -> f64 {
        match self {
            VerticalAnchor::Top => -1.0,
            VerticalAnchor::Center => 0.0,
            VerticalAnchor::Bottom => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAnchor {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAnchor {
    /// -1 for left, 0 for center, 1 for right
    pub fn sign(&self) -> f64 {
        match self {
            HorizontalAnchor::Left => -1.0,
            HorizontalAnchor::Center => 0.0,
            HorizontalAnchor::Right => 1.0,
        }
    }
}

/// Vertical × horizontal anchor of a shape inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellOrientation {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

impl CellOrientation {
    pub const CENTER: CellOrientation = CellOrientation {
        vertical: VerticalAnchor::Center,
        horizontal: HorizontalAnchor::Center,
    };

    pub fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        Self { vertical, horizontal }
    }

    /// Number of axes anchored away from the center (0, 1 or 2)
    pub fn off_center_axes(&self) -> usize {
        usize::from(self.vertical != VerticalAnchor::Center)
            + usize::from(self.horizontal != HorizontalAnchor::Center)
    }
}

impl std::fmt::Display for CellOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = match self.vertical {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Center => "center",
            VerticalAnchor::Bottom => "bottom",
        };
        let h = match self.horizontal {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Center => "center",
            HorizontalAnchor::Right => "right",
        };
        write!(f, "{v} {h}")
    }
}

impl std::str::FromStr for CellOrientation {
    type Err = OrientationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut vertical = None;
        let mut horizontal = None;

        let tokens = s
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|t| !t.is_empty());

        for token in tokens {
            match token.to_ascii_lowercase().as_str() {
                "top" => set_once(&mut vertical, VerticalAnchor::Top, s)?,
                "bottom" => set_once(&mut vertical, VerticalAnchor::Bottom, s)?,
                "left" => set_once(&mut horizontal, HorizontalAnchor::Left, s)?,
                "right" => set_once(&mut horizontal, HorizontalAnchor::Right, s)?,
                "center" | "centre" | "middle" => {}
                other => return Err(OrientationParseError::UnknownToken(other.to_string())),
            }
        }

        Ok(CellOrientation {
            vertical: vertical.unwrap_or_default(),
            horizontal: horizontal.unwrap_or_default(),
        })
    }
}

fn set_once<T: PartialEq>(slot: &mut Option<T>, value: T, source: &str) -> Result<(), OrientationParseError> {
    match slot {
        Some(existing) if *existing != value => Err(OrientationParseError::Conflict(source.to_string())),
        _ => {
            *slot = Some(value);
            Ok(())
        }
    }
}

impl TryFrom<String> for CellOrientation {
    type Error = OrientationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellOrientation> for String {
    fn from(o: CellOrientation) -> Self {
        o.to_string()
    }
}
