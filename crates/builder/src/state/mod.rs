pub mod composition;
pub mod selection;
pub mod settings;

pub use composition::CompositionState;
pub use selection::SelectionState;
pub use settings::{BuilderSettings, EditorMode};

use shared::{Category, CompositionDocument, GridKind, ShapeCatalog, ShapeKey, Texture};

use crate::error::{LoadError, PlaceError};
use crate::grid::Placement;
use crate::hover::{HoverPolicy, HoverPreview};
use crate::placement::{PlacementConfig, PlacementEngine, PlacementOutcome};
use crate::serializer::{self, HydrationReport};

/// One editing session: catalog, composition, selection and mode.
///
/// The catalog is fixed for the lifetime of the session. Placement config and
/// hover policy are derived from the settings when the session starts and
/// again only on an explicit mode change.
pub struct BuilderState {
    catalog: ShapeCatalog,
    pub composition: CompositionState,
    pub selection: SelectionState,
    pub settings: BuilderSettings,
    config: PlacementConfig,
    hover: HoverPolicy,
}

impl BuilderState {
    pub fn new(catalog: ShapeCatalog, settings: BuilderSettings) -> Self {
        tracing::info!(
            shapes = catalog.len(),
            mode = settings.mode.display_name(),
            "session started"
        );
        Self {
            catalog,
            composition: CompositionState::new("untitled", settings.undo_limit),
            selection: SelectionState::default(),
            config: settings.placement_config(),
            hover: settings.hover_policy(),
            settings,
        }
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    pub fn placement_config(&self) -> PlacementConfig {
        self.config
    }

    pub fn hover_policy(&self) -> HoverPolicy {
        self.hover
    }

    /// Engine bound to this session's catalog and config
    pub fn engine(&self) -> PlacementEngine<'_> {
        PlacementEngine::new(&self.catalog, self.config)
    }

    /// Switch editor mode; rebuilds the placement config and hover policy
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.settings.mode = mode;
        self.config = self.settings.placement_config();
        self.hover = self.settings.hover_policy();
        tracing::info!(mode = mode.display_name(), "editor mode changed");
    }

    pub fn select(&mut self, key: ShapeKey) -> Result<(), PlaceError> {
        if !self.catalog.contains(&key) {
            return Err(PlaceError::UnknownShape(key));
        }
        self.selection.select(key);
        Ok(())
    }

    pub fn place(
        &mut self,
        kind: GridKind,
        anchor: usize,
        key: &ShapeKey,
        texture: Option<Texture>,
    ) -> Result<PlacementOutcome, PlaceError> {
        let engine = PlacementEngine::new(&self.catalog, self.config);
        let outcome = self.composition.place(&engine, kind, anchor, key, texture)?;
        self.after_edit();
        Ok(outcome)
    }

    /// Place the selected shape with the selected texture
    pub fn place_selected(&mut self, kind: GridKind, anchor: usize) -> Result<PlacementOutcome, PlaceError> {
        let key = self.selection.require_shape()?.clone();
        let texture = self.selection.texture().cloned();
        self.place(kind, anchor, &key, texture)
    }

    pub fn erase(&mut self, kind: GridKind, cell: usize, category: Category) -> Vec<Placement> {
        let engine = PlacementEngine::new(&self.catalog, self.config);
        let removed = self.composition.erase(&engine, kind, cell, category);
        if !removed.is_empty() {
            self.after_edit();
        }
        removed
    }

    /// Preview the selected shape at a cell
    pub fn hover(&self, kind: GridKind, anchor: usize) -> Result<HoverPreview, PlaceError> {
        let key = self.selection.require_shape()?;
        Ok(self.hover.preview(&self.catalog, &self.composition.grids, kind, anchor, key))
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.composition.undo();
        if undone {
            self.after_edit();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.composition.redo();
        if redone {
            self.after_edit();
        }
        redone
    }

    /// Empty both grids and the selection
    pub fn clear(&mut self) {
        self.composition.clear();
        self.selection.clear();
        self.after_edit();
    }

    pub fn load_document(&mut self, doc: &CompositionDocument) -> HydrationReport {
        let engine = PlacementEngine::new(&self.catalog, self.config);
        let report = self.composition.load_document(doc, &engine);
        self.after_edit();
        report
    }

    /// Parse and load a document; malformed JSON changes nothing
    pub fn load_json(&mut self, json: &str) -> Result<HydrationReport, LoadError> {
        let doc = serializer::parse(json)?;
        Ok(self.load_document(&doc))
    }

    pub fn export_document(&self) -> CompositionDocument {
        self.composition.to_document()
    }

    fn after_edit(&self) {
        if self.settings.autosave {
            self.composition.autosave();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn session(mode: EditorMode) -> BuilderState {
        let settings = BuilderSettings {
            mode,
            ..Default::default()
        };
        BuilderState::new(test_catalog(), settings)
    }

    #[test]
    fn test_place_selected_requires_selection() {
        let mut s = session(EditorMode::Free);
        assert_eq!(
            s.place_selected(GridKind::Serifs, 12).unwrap_err(),
            PlaceError::NothingSelected
        );
        s.select(body_key("0_deg", "horizontal")).unwrap();
        s.place_selected(GridKind::Serifs, 12).unwrap();
        assert_eq!(s.composition.grids.placement_count(), 1);
    }

    #[test]
    fn test_select_unknown_rejected() {
        let mut s = session(EditorMode::Free);
        assert!(matches!(
            s.select(body_key("0_deg", "nope")),
            Err(PlaceError::UnknownShape(_))
        ));
        assert!(s.selection.shape().is_none());
    }

    #[test]
    fn test_set_mode_switches_policies() {
        let mut s = session(EditorMode::Free);
        assert_eq!(s.hover_policy(), HoverPolicy::Unconstrained);
        s.set_mode(EditorMode::Constrained);
        assert_eq!(s.hover_policy(), HoverPolicy::Constrained);
        assert!(s.placement_config().strict_clearing);
    }

    #[test]
    fn test_constrained_session_rejects() {
        let mut s = session(EditorMode::Constrained);
        s.place(GridKind::Serifs, 12, &body_key("0_deg", "shape_a"), None)
            .unwrap();
        let before = s.composition.grids.clone();
        let err = s
            .place(GridKind::Serifs, 13, &body_key("0_deg", "shape_b"), None)
            .unwrap_err();
        assert!(matches!(err, PlaceError::ConstraintViolation(_)));
        assert_eq!(s.composition.grids, before);
    }

    #[test]
    fn test_load_json_malformed_keeps_state() {
        let mut s = session(EditorMode::Free);
        s.place(GridKind::Serifs, 0, &serif_key("0_deg", "cap"), None)
            .unwrap();
        assert!(s.load_json("][").is_err());
        assert_eq!(s.composition.grids.placement_count(), 1);
    }
}
