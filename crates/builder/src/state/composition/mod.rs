//! Composition state management
//!
//! This module provides the live grids of one composition with undo/redo
//! history and autosave.

mod history;
mod persistence;

use shared::{Category, CompositionDocument, GridKind, ShapeKey, Texture};

use crate::error::PlaceError;
use crate::grid::{GridSet, Placement};
use crate::placement::{PlacementEngine, PlacementOutcome};
use crate::serializer::{self, HydrationReport};

/// Composition being edited, with undo/redo history
#[derive(Debug)]
pub struct CompositionState {
    /// Composition name, stored in document metadata
    pub name: String,
    /// Current grids
    pub grids: GridSet,
    /// Undo stack - previous states
    pub(crate) undo_stack: Vec<GridSet>,
    /// Redo stack - undone states
    pub(crate) redo_stack: Vec<GridSet>,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
    undo_limit: usize,
}

impl Default for CompositionState {
    fn default() -> Self {
        Self::new("untitled", 100)
    }
}

impl CompositionState {
    pub fn new(name: impl Into<String>, undo_limit: usize) -> Self {
        Self {
            name: name.into(),
            grids: GridSet::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            version: 0,
            undo_limit: undo_limit.max(1),
        }
    }

    /// Current version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Bump version without saving undo
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    /// Push a snapshot taken before a mutation
    fn commit_undo(&mut self, before: GridSet) {
        self.undo_stack.push(before);
        if self.undo_stack.len() > self.undo_limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.version += 1;
    }

    /// Place a shape through `engine`; rejected placements leave no history
    pub fn place(
        &mut self,
        engine: &PlacementEngine<'_>,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
        texture: Option<Texture>,
    ) -> Result<PlacementOutcome, PlaceError> {
        let before = self.grids.clone();
        let outcome = engine.place(&mut self.grids, kind, anchor, key, texture)?;
        self.commit_undo(before);
        Ok(outcome)
    }

    /// Erase placements of `category` at `cell`; empty erases leave no history
    pub fn erase(
        &mut self,
        engine: &PlacementEngine<'_>,
        kind: GridKind,
        cell: usize,
        category: Category,
    ) -> Vec<Placement> {
        let before = self.grids.clone();
        let removed = engine.erase(&mut self.grids, kind, cell, category);
        if !removed.is_empty() {
            self.commit_undo(before);
        }
        removed
    }

    /// Clear both grids (undoable)
    pub fn clear(&mut self) {
        if self.grids.is_empty() {
            return;
        }
        let before = self.grids.clone();
        self.grids.clear();
        self.commit_undo(before);
    }

    /// Replace the composition with a document (undoable)
    pub fn load_document(&mut self, doc: &CompositionDocument, engine: &PlacementEngine<'_>) -> HydrationReport {
        let before = self.grids.clone();
        let mut grids = GridSet::new();
        let report = serializer::hydrate(doc, &mut grids, engine);
        self.grids = grids;
        self.name = doc.metadata.name.clone();
        self.commit_undo(before);
        report
    }

    /// Snapshot as a document
    pub fn to_document(&self) -> CompositionDocument {
        serializer::serialize(&self.grids, &self.name)
    }
}
