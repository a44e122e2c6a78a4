//! Error types for placement, loading and storage.

use shared::{Category, Direction, GridKind, ShapeKey};

/// Which side of a pairing refused the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusingSide {
    /// The shape being placed has no matching point towards the neighbour
    Candidate,
    /// The neighbour has no matching point back towards the candidate
    Neighbor,
}

/// Diagnostic for a rejected connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Footprint cell of the candidate
    pub cell: usize,
    /// Occupied neighbouring cell
    pub neighbor_cell: usize,
    /// Direction from `cell` to `neighbor_cell`
    pub direction: Direction,
    pub neighbor: ShapeKey,
    pub refused_by: RefusingSide,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.refused_by {
            RefusingSide::Candidate => write!(
                f,
                "cell {} does not connect {} to {} at cell {}",
                self.cell, self.direction, self.neighbor, self.neighbor_cell
            ),
            RefusingSide::Neighbor => write!(
                f,
                "{} at cell {} does not accept a connection from its {} side",
                self.neighbor,
                self.neighbor_cell,
                self.direction.opposite()
            ),
        }
    }
}

/// Rejected placement. The grid is never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("shape extends past the edge of the {grid} grid from cell {anchor}")]
    OutOfBounds { grid: GridKind, anchor: usize },

    #[error("{category} shapes cannot be placed on the {grid} grid")]
    WrongGridKind { category: Category, grid: GridKind },

    #[error("connection refused: {0}")]
    ConstraintViolation(Violation),

    #[error("shape {0} is not in the catalog")]
    UnknownShape(ShapeKey),

    #[error("cell {index} does not exist on the {grid} grid")]
    NoSuchCell { grid: GridKind, index: usize },

    #[error("no shape selected")]
    NothingSelected,
}

/// Hard failure while loading a composition
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("malformed composition document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Composition store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no stored composition with id '{0}'")]
    NotFound(String),

    #[error("invalid composition id '{0}'")]
    InvalidId(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Archive loading failure
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive holds no readable compositions")]
    Empty,

    #[error("archive has no composition for letter '{0}'")]
    MissingLetter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest JSON error: {0}")]
    Manifest(#[from] serde_json::Error),
}
