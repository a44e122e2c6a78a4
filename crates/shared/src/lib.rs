use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod connection;
pub mod document;
pub mod geometry;

pub use catalog::{CatalogError, Footprint, ShapeCatalog, ShapeDefinition};
pub use connection::{ConnectionPoint, ConnectionPoints, MatcherParseError, ShapeMatcher};
pub use document::{
    sanitize_file_name, ArchiveManifest, CompositionDocument, CompositionMetadata, GridSnapshot,
    Grids, ShapeRecord, FORMAT_VERSION,
};
pub use geometry::{CellOrientation, Direction, HorizontalAnchor, OrientationParseError, VerticalAnchor};

/// Structural shape class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bodies,
    Serifs,
    Joins,
}

impl Category {
    /// Grid the category is placed on
    pub fn grid_kind(&self) -> GridKind {
        match self {
            Category::Bodies | Category::Serifs => GridKind::Serifs,
            Category::Joins => GridKind::Joins,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bodies => "bodies",
            Category::Serifs => "serifs",
            Category::Joins => "joins",
        }
    }

    pub fn all() -> &'static [Category] {
        &[Category::Bodies, Category::Serifs, Category::Joins]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bodies" | "body" => Ok(Category::Bodies),
            "serifs" | "serif" => Ok(Category::Serifs),
            "joins" | "join" => Ok(Category::Joins),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// One of the two overlaid grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridKind {
    /// 5×5 grid holding bodies and serifs
    Serifs,
    /// 4×4 grid holding joins, inset by half a cell
    Joins,
}

impl GridKind {
    /// Cells per side
    pub fn size(&self) -> usize {
        match self {
            GridKind::Serifs => 5,
            GridKind::Joins => 4,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.size() * self.size()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridKind::Serifs => "serifs",
            GridKind::Joins => "joins",
        }
    }

    pub fn all() -> &'static [GridKind] {
        &[GridKind::Serifs, GridKind::Joins]
    }
}

impl std::fmt::Display for GridKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discretized rotation class, e.g. `0_deg` or `22_5_deg`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleBucket(pub String);

impl AngleBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rotation in degrees, if the bucket name encodes one.
    ///
    /// Accepts `22_5_deg`, `22.5deg`, `22.5°` and plain `22.5`.
    pub fn degrees(&self) -> Option<f64> {
        let trimmed = self
            .0
            .trim()
            .trim_end_matches('°')
            .trim_end_matches("_deg")
            .trim_end_matches("deg")
            .trim_end_matches('_');
        trimmed.replace('_', ".").parse().ok()
    }
}

impl std::fmt::Display for AngleBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AngleBucket {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Full identity of a catalog shape
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeKey {
    pub category: Category,
    pub angle_bucket: AngleBucket,
    pub shape_name: String,
}

impl ShapeKey {
    pub fn new(category: Category, angle_bucket: impl Into<String>, shape_name: impl Into<String>) -> Self {
        Self {
            category,
            angle_bucket: AngleBucket(angle_bucket.into()),
            shape_name: shape_name.into(),
        }
    }
}

impl std::fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.angle_bucket, self.shape_name)
    }
}

/// Texture applied to a placed shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Texture {
    Color(String),
    Image(String),
}

impl Texture {
    /// Classify a bare texture string: colours start with `#`, `rgb(` or `rgba(`
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let lower = value.trim().to_ascii_lowercase();
        if lower.starts_with('#') || lower.starts_with("rgb(") || lower.starts_with("rgba(") {
            Texture::Color(value)
        } else {
            Texture::Image(value)
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Texture::Color(v) | Texture::Image(v) => v,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextureRepr {
    Tagged {
        kind: String,
        value: String,
    },
    Bare(String),
}

impl<'de> Deserialize<'de> for Texture {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match TextureRepr::deserialize(deserializer)? {
            TextureRepr::Tagged { kind, value } => match kind.as_str() {
                "color" | "colour" => Ok(Texture::Color(value)),
                "image" => Ok(Texture::Image(value)),
                // Unknown kinds fall back to classification by value
                _ => Ok(Texture::from_value(value)),
            },
            TextureRepr::Bare(value) => Ok(Texture::from_value(value)),
        }
    }
}
