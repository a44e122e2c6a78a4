//! Hover previews.
//!
//! The policy is picked once per session from the editor mode. The
//! constrained preview runs the same validator that gates `place`, so a
//! preview marked valid is always placeable.

use serde::Serialize;
use shared::{GridKind, ShapeCatalog, ShapeKey};

use crate::connection::ConnectionValidator;
use crate::error::{PlaceError, Violation};
use crate::grid::GridSet;
use crate::placement::PlacementEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverPolicy {
    /// Preview footprint only
    Unconstrained,
    /// Preview footprint plus connection verdict
    Constrained,
}

/// Advisory verdict for highlighting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum HoverVerdict {
    Placeable,
    Blocked { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverPreview {
    pub grid: GridKind,
    pub anchor: usize,
    /// In-bounds footprint cells; a partial list when the shape overhangs
    pub cells: Vec<usize>,
    #[serde(flatten)]
    pub verdict: HoverVerdict,
    #[serde(skip)]
    pub violations: Vec<Violation>,
}

impl HoverPreview {
    pub fn is_placeable(&self) -> bool {
        self.verdict == HoverVerdict::Placeable
    }
}

impl HoverPolicy {
    pub fn for_mode(constrained: bool) -> Self {
        if constrained {
            HoverPolicy::Constrained
        } else {
            HoverPolicy::Unconstrained
        }
    }

    /// Preview `key` at `anchor` without touching the grid
    pub fn preview(
        &self,
        catalog: &ShapeCatalog,
        grids: &GridSet,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
    ) -> HoverPreview {
        let grid = grids.get(kind);
        let cells: Vec<usize> = catalog
            .lookup(key)
            .map(|shape| {
                PlacementEngine::compute_footprint(grid, anchor, shape)
                    .into_iter()
                    .flatten()
                    .collect()
            })
            .unwrap_or_default();

        let mut violations = Vec::new();
        let gate = || -> Result<(), PlaceError> {
            if key.category.grid_kind() != kind {
                return Err(PlaceError::WrongGridKind {
                    category: key.category,
                    grid: kind,
                });
            }
            if grid.cell_at(anchor).is_none() {
                return Err(PlaceError::NoSuchCell { grid: kind, index: anchor });
            }
            let validator = ConnectionValidator::new(catalog);
            match self {
                HoverPolicy::Unconstrained => {
                    let shape = catalog
                        .lookup(key)
                        .ok_or_else(|| PlaceError::UnknownShape(key.clone()))?;
                    let in_bounds = PlacementEngine::compute_footprint(grid, anchor, shape)
                        .iter()
                        .all(Option::is_some);
                    if in_bounds {
                        Ok(())
                    } else {
                        Err(PlaceError::OutOfBounds { grid: kind, anchor })
                    }
                }
                HoverPolicy::Constrained => validator.check(grid, anchor, key),
            }
        };

        let verdict = match gate() {
            Ok(()) => HoverVerdict::Placeable,
            Err(e) => {
                if let (HoverPolicy::Constrained, PlaceError::ConstraintViolation(_)) = (self, &e) {
                    violations = ConnectionValidator::new(catalog)
                        .violations(grid, anchor, key)
                        .unwrap_or_default();
                }
                HoverVerdict::Blocked { reason: e.to_string() }
            }
        };

        HoverPreview {
            grid: kind,
            anchor,
            cells,
            verdict,
            violations,
        }
    }
}
