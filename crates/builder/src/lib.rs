// Library crate: the placement engine, editing state and command interface.
// The binary only adds argument parsing and logging setup.

pub mod archive;
pub mod command;
pub mod connection;
pub mod error;
pub mod fixtures;
pub mod grid;
pub mod harness;
pub mod hover;
pub mod layout;
pub mod placement;
pub mod serializer;
pub mod state;
pub mod store;

pub use error::{ArchiveError, LoadError, PlaceError, StoreError, Violation};
pub use grid::{Grid, GridSet, Placement, PlacementId};
pub use placement::{PlacementConfig, PlacementEngine, PlacementOutcome};
