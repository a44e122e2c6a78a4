//! Co-registered layout of the two grids.
//!
//! The joins grid is inset by half a cell on both axes, so its cell corners
//! sit on serifs-grid cell centres. Only rendering and export care about
//! this; placement and validation treat each grid on its own.

use serde::Serialize;
use shared::{GridKind, HorizontalAnchor, VerticalAnchor};

use crate::placement::Positioning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Edge of one cell; both grids share it
    pub cell_size: f64,
}

impl Layout {
    pub fn new(cell_size: f64) -> Self {
        Self { cell_size }
    }

    /// Offset of a grid's origin from the canvas origin
    pub fn inset(&self, kind: GridKind) -> f64 {
        match kind {
            GridKind::Serifs => 0.0,
            GridKind::Joins => self.cell_size / 2.0,
        }
    }

    /// Side of the square canvas (the serifs grid)
    pub fn canvas_size(&self) -> f64 {
        GridKind::Serifs.size() as f64 * self.cell_size
    }

    pub fn cell_rect(&self, kind: GridKind, index: usize) -> Option<Rect> {
        let size = kind.size();
        if index >= kind.cell_count() {
            return None;
        }
        let inset = self.inset(kind);
        Some(Rect {
            x: inset + (index % size) as f64 * self.cell_size,
            y: inset + (index / size) as f64 * self.cell_size,
            width: self.cell_size,
            height: self.cell_size,
        })
    }

    /// Canvas point where a placement's artwork is anchored
    pub fn placement_origin(&self, kind: GridKind, positioning: &Positioning) -> Option<Point> {
        let rect = self.cell_rect(kind, positioning.origin_cell)?;
        let x = match positioning.anchor.horizontal {
            HorizontalAnchor::Left => rect.x,
            HorizontalAnchor::Center => rect.x + rect.width / 2.0,
            HorizontalAnchor::Right => rect.x + rect.width,
        };
        let y = match positioning.anchor.vertical {
            VerticalAnchor::Top => rect.y,
            VerticalAnchor::Center => rect.y + rect.height / 2.0,
            VerticalAnchor::Bottom => rect.y + rect.height,
        };
        Some(Point {
            x: x + positioning.offset.x / 100.0 * self.cell_size,
            y: y + positioning.offset.y / 100.0 * self.cell_size,
        })
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(100.0)
    }
}
