//! Connection validation for constrained mode.
//!
//! `ConnectionValidator` decides whether a candidate shape may sit next to
//! the shapes already on a grid. Every occupied neighbour (8 directions,
//! same grid only) must agree in both directions: the candidate must accept
//! the neighbour and the neighbour must accept the candidate. One refusal
//! rejects the whole placement. A multi-cell neighbour that also covers a
//! footprint cell is a co-occupant rather than a neighbour and is not
//! checked. Validation never mutates the grid.

use shared::{ConnectionPoints, ShapeCatalog, ShapeDefinition, ShapeKey};

use crate::error::{PlaceError, RefusingSide, Violation};
use crate::grid::Grid;
use crate::placement::PlacementEngine;

/// Connection points that apply to one sub-cell of a shape.
///
/// Multi-cell shapes currently expose all of their points from every
/// sub-cell; filtering by exposed side would change which placements are
/// accepted.
pub fn effective_connection_points(shape: &ShapeDefinition, _sub_cell: usize) -> &ConnectionPoints {
    &shape.allowed_connection_points
}

/// Validator over a catalog
pub struct ConnectionValidator<'a> {
    catalog: &'a ShapeCatalog,
}

impl<'a> ConnectionValidator<'a> {
    pub fn new(catalog: &'a ShapeCatalog) -> Self {
        Self { catalog }
    }

    /// True when `key` may be placed at `anchor`
    pub fn validate(&self, grid: &Grid, anchor: usize, key: &ShapeKey) -> bool {
        self.check(grid, anchor, key).is_ok()
    }

    /// Like `validate`, reporting the first refusal
    pub fn check(&self, grid: &Grid, anchor: usize, key: &ShapeKey) -> Result<(), PlaceError> {
        match self.violations_inner(grid, anchor, key, true)?.into_iter().next() {
            Some(v) => Err(PlaceError::ConstraintViolation(v)),
            None => Ok(()),
        }
    }

    /// Every refused pairing, for diagnostics and hover highlighting
    pub fn violations(&self, grid: &Grid, anchor: usize, key: &ShapeKey) -> Result<Vec<Violation>, PlaceError> {
        self.violations_inner(grid, anchor, key, false)
    }

    fn violations_inner(
        &self,
        grid: &Grid,
        anchor: usize,
        key: &ShapeKey,
        stop_at_first: bool,
    ) -> Result<Vec<Violation>, PlaceError> {
        let shape = self
            .catalog
            .lookup(key)
            .ok_or_else(|| PlaceError::UnknownShape(key.clone()))?;

        let footprint = PlacementEngine::compute_footprint(grid, anchor, shape);
        let cells: Vec<usize> = footprint
            .into_iter()
            .collect::<Option<_>>()
            .ok_or(PlaceError::OutOfBounds {
                grid: grid.kind(),
                anchor,
            })?;

        let mut violations = Vec::new();

        for (sub_cell, &cell) in cells.iter().enumerate() {
            let own_points = effective_connection_points(shape, sub_cell);

            for (direction, neighbor_cell) in grid.neighbors(cell) {
                if cells.contains(&neighbor_cell) {
                    continue;
                }

                for neighbor in grid.placements_at(neighbor_cell) {
                    if neighbor.cells.iter().any(|c| cells.contains(c)) {
                        continue;
                    }
                    let refused_by = if !own_points.allows(
                        direction,
                        &neighbor.key.angle_bucket,
                        &neighbor.key.shape_name,
                    ) {
                        Some(RefusingSide::Candidate)
                    } else {
                        let neighbor_sub = neighbor
                            .cells
                            .iter()
                            .position(|&c| c == neighbor_cell)
                            .unwrap_or_default();
                        let accepts_back = self.catalog.lookup(&neighbor.key).is_some_and(|ns| {
                            effective_connection_points(ns, neighbor_sub).allows(
                                direction.opposite(),
                                &key.angle_bucket,
                                &key.shape_name,
                            )
                        });
                        (!accepts_back).then_some(RefusingSide::Neighbor)
                    };

                    if let Some(refused_by) = refused_by {
                        tracing::debug!(
                            candidate = %key,
                            neighbor = %neighbor.key,
                            cell,
                            neighbor_cell,
                            direction = %direction,
                            "connection refused"
                        );
                        violations.push(Violation {
                            cell,
                            neighbor_cell,
                            direction,
                            neighbor: neighbor.key.clone(),
                            refused_by,
                        });
                        if stop_at_first {
                            return Ok(violations);
                        }
                    }
                }
            }
        }

        Ok(violations)
    }
}
