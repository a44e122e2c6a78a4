//! Shape catalog: category → angle bucket → shape definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::connection::ConnectionPoints;
use crate::geometry::CellOrientation;
use crate::{AngleBucket, Category, ShapeKey};

fn default_span() -> u8 {
    1
}

/// Immutable shape entry from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDefinition {
    pub name: String,
    /// Footprint width in cells (1 or 2)
    #[serde(default = "default_span")]
    pub width: u8,
    /// Footprint height in cells (1 or 2)
    #[serde(default = "default_span")]
    pub height: u8,
    #[serde(default, alias = "cellOrientation")]
    pub cell_orientation: CellOrientation,
    #[serde(default, alias = "allowedConnectionPoints")]
    pub allowed_connection_points: ConnectionPoints,
    /// SVG geometry, passed through untouched
    #[serde(default, alias = "svg_geometry", skip_serializing_if = "String::is_empty")]
    pub svg: String,
}

/// Cells a shape covers relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Footprint {
    /// 1×1
    Single,
    /// 2×1: anchor plus the cell to its right
    Wide,
    /// 1×2: anchor plus the cell below
    Tall,
}

impl Footprint {
    pub fn cell_count(&self) -> usize {
        match self {
            Footprint::Single => 1,
            Footprint::Wide | Footprint::Tall => 2,
        }
    }

    /// (row, col) offsets from the anchor, anchor first
    pub fn offsets(&self) -> &'static [(usize, usize)] {
        match self {
            Footprint::Single => &[(0, 0)],
            Footprint::Wide => &[(0, 0), (0, 1)],
            Footprint::Tall => &[(0, 0), (1, 0)],
        }
    }
}

impl ShapeDefinition {
    pub fn footprint(&self) -> Result<Footprint, CatalogError> {
        match (self.width, self.height) {
            (1, 1) => Ok(Footprint::Single),
            (2, 1) => Ok(Footprint::Wide),
            (1, 2) => Ok(Footprint::Tall),
            (width, height) => Err(CatalogError::InvalidFootprint {
                shape: self.name.clone(),
                width,
                height,
            }),
        }
    }

    pub fn is_multi_cell(&self) -> bool {
        self.width > 1 || self.height > 1
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape '{shape}' has unsupported footprint {width}x{height}")]
    InvalidFootprint { shape: String, width: u8, height: u8 },

    #[error("shape '{shape}' is declared twice in {category}/{bucket}")]
    DuplicateShape {
        category: Category,
        bucket: AngleBucket,
        shape: String,
    },
}

/// Read-only lookup table loaded once per session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeCatalog {
    categories: BTreeMap<Category, BTreeMap<AngleBucket, Vec<ShapeDefinition>>>,
}

impl ShapeCatalog {
    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: ShapeCatalog = serde_json::from_str(json)?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Footprints in {1×1, 2×1, 1×2} and unique names per bucket
    pub fn check(&self) -> Result<(), CatalogError> {
        for (category, buckets) in &self.categories {
            for (bucket, shapes) in buckets {
                for (i, shape) in shapes.iter().enumerate() {
                    shape.footprint()?;
                    if shapes[..i].iter().any(|s| s.name == shape.name) {
                        return Err(CatalogError::DuplicateShape {
                            category: *category,
                            bucket: bucket.clone(),
                            shape: shape.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Add a shape (used when assembling catalogs in code)
    pub fn insert(&mut self, category: Category, bucket: impl Into<String>, shape: ShapeDefinition) {
        let shapes = self
            .categories
            .entry(category)
            .or_default()
            .entry(AngleBucket(bucket.into()))
            .or_default();
        shapes.retain(|s| s.name != shape.name);
        shapes.push(shape);
    }

    pub fn get(&self, category: Category, bucket: &AngleBucket, name: &str) -> Option<&ShapeDefinition> {
        self.categories
            .get(&category)?
            .get(bucket)?
            .iter()
            .find(|s| s.name == name)
    }

    pub fn lookup(&self, key: &ShapeKey) -> Option<&ShapeDefinition> {
        self.get(key.category, &key.angle_bucket, &key.shape_name)
    }

    pub fn contains(&self, key: &ShapeKey) -> bool {
        self.lookup(key).is_some()
    }

    /// Angle buckets of a category, in sorted order
    pub fn buckets(&self, category: Category) -> impl Iterator<Item = &AngleBucket> {
        self.categories.get(&category).into_iter().flat_map(|b| b.keys())
    }

    pub fn shapes(&self, category: Category, bucket: &AngleBucket) -> &[ShapeDefinition] {
        self.categories
            .get(&category)
            .and_then(|b| b.get(bucket))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every shape with its full key
    pub fn iter(&self) -> impl Iterator<Item = (ShapeKey, &ShapeDefinition)> {
        self.categories.iter().flat_map(|(category, buckets)| {
            buckets.iter().flat_map(move |(bucket, shapes)| {
                shapes.iter().map(move |shape| {
                    (
                        ShapeKey {
                            category: *category,
                            angle_bucket: bucket.clone(),
                            shape_name: shape.name.clone(),
                        },
                        shape,
                    )
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.categories
            .values()
            .flat_map(|b| b.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
