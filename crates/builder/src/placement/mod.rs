//! Placement engine: footprints, clearing policy, insert and erase.

pub mod positioning;

pub use positioning::{Offset, Positioning};

use shared::{Category, GridKind, ShapeCatalog, ShapeDefinition, ShapeKey, Texture};

use crate::connection::ConnectionValidator;
use crate::error::PlaceError;
use crate::grid::{Grid, GridSet, Placement, PlacementId};

/// Engine switches fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementConfig {
    /// Gate every placement through the connection validator
    pub constrained: bool,
    /// Clear the footprint before every insert, whatever the category
    pub strict_clearing: bool,
}

impl PlacementConfig {
    pub fn free() -> Self {
        Self {
            constrained: false,
            strict_clearing: false,
        }
    }

    pub fn constrained() -> Self {
        Self {
            constrained: true,
            strict_clearing: true,
        }
    }
}

/// How existing occupants of the footprint are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Apply the engine's clearing policy
    Policy,
    /// Never clear; add alongside existing occupants
    Overlay,
}

/// Result of a successful placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOutcome {
    pub id: PlacementId,
    pub grid: GridKind,
    /// Footprint, anchor first
    pub cells: Vec<usize>,
    /// Placements removed by clearing
    pub cleared: Vec<Placement>,
}

/// Places and erases shapes on a `GridSet` using a read-only catalog
pub struct PlacementEngine<'a> {
    catalog: &'a ShapeCatalog,
    config: PlacementConfig,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(catalog: &'a ShapeCatalog, config: PlacementConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a ShapeCatalog {
        self.catalog
    }

    pub fn config(&self) -> PlacementConfig {
        self.config
    }

    /// Cells a shape would occupy from `anchor`, anchor first.
    ///
    /// Multi-cell shapes always extend right and/or down. A `None` entry
    /// means that cell falls outside the grid.
    pub fn compute_footprint(grid: &Grid, anchor: usize, shape: &ShapeDefinition) -> Vec<Option<usize>> {
        let mut cells = Vec::with_capacity(usize::from(shape.width) * usize::from(shape.height));
        for dr in 0..isize::from(shape.height.max(1)) {
            for dc in 0..isize::from(shape.width.max(1)) {
                cells.push(grid.offset(anchor, dr, dc));
            }
        }
        cells
    }

    /// Whether placing `category` over `cell_count` cells clears them first
    pub fn should_clear(&self, category: Category, cell_count: usize) -> bool {
        self.config.strict_clearing || category == Category::Serifs || cell_count > 1
    }

    pub fn resolve(&self, key: &ShapeKey) -> Result<&'a ShapeDefinition, PlaceError> {
        self.catalog
            .lookup(key)
            .ok_or_else(|| PlaceError::UnknownShape(key.clone()))
    }

    /// Check everything except connections; returns the shape and its footprint
    pub fn prepare(
        &self,
        grids: &GridSet,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
    ) -> Result<(&'a ShapeDefinition, Vec<usize>), PlaceError> {
        if key.category.grid_kind() != kind {
            return Err(PlaceError::WrongGridKind {
                category: key.category,
                grid: kind,
            });
        }
        let grid = grids.get(kind);
        if grid.cell_at(anchor).is_none() {
            return Err(PlaceError::NoSuchCell { grid: kind, index: anchor });
        }
        let shape = self.resolve(key)?;
        let cells = Self::compute_footprint(grid, anchor, shape)
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(PlaceError::OutOfBounds { grid: kind, anchor })?;
        Ok((shape, cells))
    }

    /// Place a shape, gated by the connection validator in constrained mode
    pub fn place(
        &self,
        grids: &mut GridSet,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
        texture: Option<Texture>,
    ) -> Result<PlacementOutcome, PlaceError> {
        let (_, cells) = self.prepare(grids, kind, anchor, key)?;
        if self.config.constrained {
            ConnectionValidator::new(self.catalog).check(grids.get(kind), anchor, key)?;
        }
        Ok(self.commit(grids, kind, key, cells, texture, ClearMode::Policy))
    }

    /// Add a shape without clearing or connection checks
    pub fn insert_overlay(
        &self,
        grids: &mut GridSet,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
        texture: Option<Texture>,
    ) -> Result<PlacementOutcome, PlaceError> {
        self.replay(grids, kind, anchor, key, texture, ClearMode::Overlay)
    }

    /// Re-apply a stored shape; skips the connection gate
    pub(crate) fn replay(
        &self,
        grids: &mut GridSet,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
        texture: Option<Texture>,
        mode: ClearMode,
    ) -> Result<PlacementOutcome, PlaceError> {
        let (_, cells) = self.prepare(grids, kind, anchor, key)?;
        Ok(self.commit(grids, kind, key, cells, texture, mode))
    }

    fn commit(
        &self,
        grids: &mut GridSet,
        kind: GridKind,
        key: &ShapeKey,
        cells: Vec<usize>,
        texture: Option<Texture>,
        mode: ClearMode,
    ) -> PlacementOutcome {
        let grid = grids.get_mut(kind);

        let mut cleared = Vec::new();
        if mode == ClearMode::Policy && self.should_clear(key.category, cells.len()) {
            let mut doomed: Vec<PlacementId> = Vec::new();
            for &cell in &cells {
                for p in grid.placements_at(cell) {
                    if !doomed.contains(&p.id) {
                        doomed.push(p.id);
                    }
                }
            }
            cleared.extend(doomed.into_iter().filter_map(|id| grid.remove(id)));
        }

        let placement = Placement {
            id: uuid::Uuid::new_v4(),
            key: key.clone(),
            anchor: cells[0],
            cells: cells.clone(),
            texture,
        };
        let id = placement.id;
        grid.insert(placement);

        tracing::debug!(
            grid = %kind,
            anchor = cells[0],
            shape = %key,
            cleared = cleared.len(),
            "placed shape"
        );

        PlacementOutcome {
            id,
            grid: kind,
            cells,
            cleared,
        }
    }

    /// Remove placements of `category` touching `cell`.
    ///
    /// A covered cell resolves to its anchor, so the whole multi-cell shape
    /// goes. Erasing an empty cell is a no-op.
    pub fn erase(&self, grids: &mut GridSet, kind: GridKind, cell: usize, category: Category) -> Vec<Placement> {
        let grid = grids.get_mut(kind);
        let ids: Vec<PlacementId> = grid
            .placements_at(cell)
            .into_iter()
            .filter(|p| p.category() == category)
            .map(|p| p.id)
            .collect();

        let removed: Vec<Placement> = ids.into_iter().filter_map(|id| grid.remove(id)).collect();
        if !removed.is_empty() {
            tracing::debug!(grid = %kind, cell, %category, removed = removed.len(), "erased shapes");
        }
        removed
    }

    /// Visual positioning of a placement
    pub fn positioning(&self, placement: &Placement) -> Option<Positioning> {
        let shape = self.catalog.lookup(&placement.key)?;
        Some(positioning::position(
            placement.key.category,
            &placement.key.angle_bucket,
            shape,
            &placement.cells,
        ))
    }
}
