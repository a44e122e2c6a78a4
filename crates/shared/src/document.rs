//! Persistent composition document and archive manifest.

use serde::{Deserialize, Serialize};

use crate::{AngleBucket, Category, GridKind, ShapeKey, Texture};

/// Current composition format version
pub const FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

/// One placed shape in a grid snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub cell_index: usize,
    pub category: Category,
    pub angle_bucket: AngleBucket,
    pub shape_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<Texture>,
}

impl ShapeRecord {
    pub fn key(&self) -> ShapeKey {
        ShapeKey {
            category: self.category,
            angle_bucket: self.angle_bucket.clone(),
            shape_name: self.shape_name.clone(),
        }
    }
}

/// All shapes of one grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub grid_type: GridKind,
    pub grid_size: usize,
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}

impl GridSnapshot {
    pub fn empty(kind: GridKind) -> Self {
        Self {
            grid_type: kind,
            grid_size: kind.size(),
            shapes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grids {
    pub serifs: GridSnapshot,
    pub joins: GridSnapshot,
}

impl Grids {
    pub fn get(&self, kind: GridKind) -> &GridSnapshot {
        match kind {
            GridKind::Serifs => &self.serifs,
            GridKind::Joins => &self.joins,
        }
    }
}

impl Default for Grids {
    fn default() -> Self {
        Self {
            serifs: GridSnapshot::empty(GridKind::Serifs),
            joins: GridSnapshot::empty(GridKind::Joins),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionMetadata {
    pub name: String,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub created_timestamp: u64,
    #[serde(default = "default_format_version")]
    pub format_version: u32,
}

/// Saved state of both grids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDocument {
    pub metadata: CompositionMetadata,
    #[serde(default)]
    pub grids: Grids,
}

impl CompositionDocument {
    /// Empty document stamped with the current time
    pub fn new(name: impl Into<String>) -> Self {
        let created_timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            metadata: CompositionMetadata {
                name: name.into(),
                created_timestamp,
                format_version: FORMAT_VERSION,
            },
            grids: Grids::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn shape_count(&self) -> usize {
        self.grids.serifs.shapes.len() + self.grids.joins.shapes.len()
    }

    /// Filesystem-safe file name derived from the composition name
    pub fn file_name(&self) -> String {
        format!("{}.json", sanitize_file_name(&self.metadata.name))
    }
}

/// Archive index listing composition documents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArchiveManifest {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Reduce a composition name to `[a-z0-9_-]`, collapsing runs of other
/// characters into a single underscore. Never empty.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        "untitled".to_string()
    } else {
        out
    }
}
