//! Headless test harness for programmatic composition editing.
//!
//! Wraps a `BuilderState` with short helpers for tests and the command
//! protocol.

use shared::{Category, GridKind, ShapeCatalog, ShapeKey, Texture};

use crate::error::{LoadError, PlaceError};
use crate::fixtures::test_catalog;
use crate::grid::Placement;
use crate::hover::HoverPreview;
use crate::layout::Layout;
use crate::placement::PlacementOutcome;
use crate::serializer::HydrationReport;
use crate::state::{BuilderSettings, BuilderState, EditorMode};

/// Headless test harness: one editing session plus a layout
pub struct TestHarness {
    pub state: BuilderState,
    pub layout: Layout,
}

impl TestHarness {
    /// Free-mode session over the fixture catalog.
    pub fn new() -> Self {
        Self::with_mode(EditorMode::Free)
    }

    pub fn with_mode(mode: EditorMode) -> Self {
        let settings = BuilderSettings {
            mode,
            ..Default::default()
        };
        Self::with_catalog(test_catalog(), settings)
    }

    pub fn with_catalog(catalog: ShapeCatalog, settings: BuilderSettings) -> Self {
        let layout = Layout::new(settings.cell_size);
        Self {
            state: BuilderState::new(catalog, settings),
            layout,
        }
    }

    // ── Editing ───────────────────────────────────────────────

    /// Select a shape by category, bucket and name
    pub fn select(&mut self, category: Category, bucket: &str, name: &str) -> Result<(), PlaceError> {
        self.state.select(ShapeKey::new(category, bucket, name))
    }

    /// Place a shape on the grid its category belongs to
    pub fn place(&mut self, key: &ShapeKey, cell: usize) -> Result<PlacementOutcome, PlaceError> {
        self.state.place(key.category.grid_kind(), cell, key, None)
    }

    pub fn place_on(&mut self, kind: GridKind, key: &ShapeKey, cell: usize) -> Result<PlacementOutcome, PlaceError> {
        self.state.place(kind, cell, key, None)
    }

    pub fn place_textured(
        &mut self,
        key: &ShapeKey,
        cell: usize,
        texture: Texture,
    ) -> Result<PlacementOutcome, PlaceError> {
        self.state.place(key.category.grid_kind(), cell, key, Some(texture))
    }

    pub fn place_selected(&mut self, kind: GridKind, cell: usize) -> Result<PlacementOutcome, PlaceError> {
        self.state.place_selected(kind, cell)
    }

    /// Erase placements of `category` at `cell` on that category's grid
    pub fn erase(&mut self, category: Category, cell: usize) -> Vec<Placement> {
        self.state.erase(category.grid_kind(), cell, category)
    }

    pub fn hover(&self, kind: GridKind, cell: usize) -> Result<HoverPreview, PlaceError> {
        self.state.hover(kind, cell)
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.state.set_mode(mode);
    }

    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.state.redo()
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    // ── Documents ─────────────────────────────────────────────

    /// Export the composition as JSON
    pub fn export_composition_json(&self) -> String {
        self.state
            .export_document()
            .to_json_pretty()
            .unwrap_or_default()
    }

    pub fn load_composition_json(&mut self, json: &str) -> Result<HydrationReport, LoadError> {
        self.state.load_json(json)
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn placement_count(&self) -> usize {
        self.state.composition.grids.placement_count()
    }

    /// Shapes occupying a cell, in insertion order
    pub fn shapes_at(&self, kind: GridKind, cell: usize) -> Vec<ShapeKey> {
        self.state
            .composition
            .grids
            .get(kind)
            .placements_at(cell)
            .into_iter()
            .map(|p| p.key.clone())
            .collect()
    }

    pub fn is_cell_empty(&self, kind: GridKind, cell: usize) -> bool {
        self.state
            .composition
            .grids
            .get(kind)
            .cell_at(cell)
            .map_or(true, |c| c.is_empty())
    }

    pub fn shape_tuples(&self) -> Vec<(GridKind, usize, ShapeKey)> {
        self.state.composition.grids.shape_tuples()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_new_harness_empty() {
        let h = TestHarness::new();
        assert_eq!(h.placement_count(), 0);
    }

    #[test]
    fn test_place_routes_to_category_grid() {
        let mut h = TestHarness::new();
        h.place(&join_key("45_deg", "link"), 2).unwrap();
        assert_eq!(h.shapes_at(GridKind::Joins, 2), vec![join_key("45_deg", "link")]);
        assert!(h.is_cell_empty(GridKind::Serifs, 2));
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut h = TestHarness::new();
        h.place(&body_key("0_deg", "horizontal"), 12).unwrap();
        assert!(h.undo());
        assert_eq!(h.placement_count(), 0);
        assert!(h.redo());
        assert_eq!(h.placement_count(), 1);
    }

    #[test]
    fn test_load_export_json() {
        let mut h = TestHarness::new();
        h.place(&body_key("0_deg", "horizontal"), 12).unwrap();
        h.place(&join_key("90_deg", "stem"), 1).unwrap();
        let json = h.export_composition_json();

        let mut h2 = TestHarness::new();
        let report = h2.load_composition_json(&json).unwrap();
        assert!(report.is_clean());
        assert_eq!(h2.shape_tuples(), h.shape_tuples());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut h = TestHarness::new();
        h.select(Category::Serifs, "0_deg", "cap").unwrap();
        h.place_selected(GridKind::Serifs, 3).unwrap();
        h.clear();
        assert_eq!(h.placement_count(), 0);
        assert!(h.state.selection.shape().is_none());
    }
}
