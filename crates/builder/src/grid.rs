//! Grid model: two fixed-size grids of cells holding placements.
//!
//! Cells are addressed by linear index (`row * size + col`) or by (row, col).
//! Lookups outside the grid return `None`; callers treat that as "no such
//! cell" rather than an error, since boundary probing is routine.

use shared::{Category, Direction, GridKind, ShapeKey, Texture};
use uuid::Uuid;

pub type PlacementId = Uuid;

/// A placed shape instance
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: PlacementId,
    pub key: ShapeKey,
    /// Cell the shape was anchored to
    pub anchor: usize,
    /// Every cell the shape occupies, anchor first
    pub cells: Vec<usize>,
    pub texture: Option<Texture>,
}

impl Placement {
    pub fn category(&self) -> Category {
        self.key.category
    }

    pub fn is_multi_cell(&self) -> bool {
        self.cells.len() > 1
    }
}

/// Entry in a cell's occupant list
#[derive(Debug, Clone, PartialEq)]
pub enum Occupant {
    /// The placement itself, stored at its anchor cell
    Anchored(Placement),
    /// Bookkeeping marker for a non-anchor cell of a multi-cell placement
    Covered { anchor: usize, id: PlacementId },
}

impl Occupant {
    pub fn placement_id(&self) -> PlacementId {
        match self {
            Occupant::Anchored(p) => p.id,
            Occupant::Covered { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    occupants: Vec<Occupant>,
}

impl Cell {
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Placements anchored in this cell, in insertion order
    pub fn anchored(&self) -> impl Iterator<Item = &Placement> {
        self.occupants.iter().filter_map(|o| match o {
            Occupant::Anchored(p) => Some(p),
            Occupant::Covered { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
    pub grid_size: usize,
}

/// One square grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    kind: GridKind,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(kind: GridKind) -> Self {
        Self {
            kind,
            cells: vec![Cell::default(); kind.cell_count()],
        }
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    pub fn cell_at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_at_rc(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index_of(row, col).and_then(|i| self.cells.get(i))
    }

    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        let size = self.size();
        (row < size && col < size).then_some(row * size + col)
    }

    pub fn position_of(&self, index: usize) -> Option<CellPosition> {
        let size = self.size();
        (index < self.cells.len()).then_some(CellPosition {
            row: index / size,
            col: index % size,
            grid_size: size,
        })
    }

    /// Cell `offset` rows down and columns right of `index`
    pub fn offset(&self, index: usize, rows: isize, cols: isize) -> Option<usize> {
        let pos = self.position_of(index)?;
        let row = pos.row.checked_add_signed(rows)?;
        let col = pos.col.checked_add_signed(cols)?;
        self.index_of(row, col)
    }

    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let (dr, dc) = direction.delta();
        self.offset(index, dr, dc)
    }

    /// In-bounds neighbours of a cell across all 8 directions
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.neighbor(index, d).map(|n| (d, n)))
    }

    /// Placement by id, wherever it is anchored
    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements().find(|p| p.id == id)
    }

    /// Placements occupying a cell, resolving covered markers to their anchor
    pub fn placements_at(&self, index: usize) -> Vec<&Placement> {
        let Some(cell) = self.cells.get(index) else {
            return Vec::new();
        };
        cell.occupants
            .iter()
            .filter_map(|o| match o {
                Occupant::Anchored(p) => Some(p),
                Occupant::Covered { anchor, id } => self
                    .cells
                    .get(*anchor)?
                    .anchored()
                    .find(|p| p.id == *id),
            })
            .collect()
    }

    /// All placements in cell order, insertion order within a cell
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.cells.iter().flat_map(|c| c.anchored())
    }

    pub fn placement_count(&self) -> usize {
        self.placements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Store a placement in every cell it covers.
    ///
    /// Cells are assumed valid; the placement engine checks them first.
    pub(crate) fn insert(&mut self, placement: Placement) {
        let anchor = placement.anchor;
        let id = placement.id;
        for &cell in placement.cells.iter().skip(1) {
            if let Some(c) = self.cells.get_mut(cell) {
                c.occupants.push(Occupant::Covered { anchor, id });
            }
        }
        if let Some(c) = self.cells.get_mut(anchor) {
            c.occupants.push(Occupant::Anchored(placement));
        }
    }

    /// Remove a placement from every cell it covers
    pub(crate) fn remove(&mut self, id: PlacementId) -> Option<Placement> {
        let mut removed = None;
        for cell in &mut self.cells {
            let mut i = 0;
            while i < cell.occupants.len() {
                if cell.occupants[i].placement_id() == id {
                    if let Occupant::Anchored(p) = cell.occupants.remove(i) {
                        removed = Some(p);
                    }
                } else {
                    i += 1;
                }
            }
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.occupants.clear();
        }
    }
}

/// The serifs grid and the joins grid of one composition
#[derive(Debug, Clone, PartialEq)]
pub struct GridSet {
    pub serifs: Grid,
    pub joins: Grid,
}

impl GridSet {
    pub fn new() -> Self {
        Self {
            serifs: Grid::new(GridKind::Serifs),
            joins: Grid::new(GridKind::Joins),
        }
    }

    pub fn get(&self, kind: GridKind) -> &Grid {
        match kind {
            GridKind::Serifs => &self.serifs,
            GridKind::Joins => &self.joins,
        }
    }

    pub fn get_mut(&mut self, kind: GridKind) -> &mut Grid {
        match kind {
            GridKind::Serifs => &mut self.serifs,
            GridKind::Joins => &mut self.joins,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.serifs.is_empty() && self.joins.is_empty()
    }

    pub fn placement_count(&self) -> usize {
        self.serifs.placement_count() + self.joins.placement_count()
    }

    /// (grid, cell, shape) for every placement; used to compare states
    pub fn shape_tuples(&self) -> Vec<(GridKind, usize, ShapeKey)> {
        let mut tuples: Vec<_> = GridKind::all()
            .iter()
            .flat_map(|&kind| {
                self.get(kind)
                    .placements()
                    .map(move |p| (kind, p.anchor, p.key.clone()))
            })
            .collect();
        tuples.sort();
        tuples
    }

    pub(crate) fn clear(&mut self) {
        self.serifs.clear();
        self.joins.clear();
    }
}

impl Default for GridSet {
    fn default() -> Self {
        Self::new()
    }
}
