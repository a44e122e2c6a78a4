//! Autosave/load functionality

use std::path::{Path, PathBuf};

use shared::CompositionDocument;

use super::CompositionState;
use crate::error::LoadError;

impl CompositionState {
    /// Get autosave file path
    pub fn autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "freebuilder", "freebuilder")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save composition to the autosave file
    pub fn autosave(&self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::warn!(path = %path.display(), "autosave failed: {e}");
        }
    }

    /// Write the composition document to `path`
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = self.to_document().to_json_pretty()?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "composition saved");
        Ok(())
    }

    /// Load composition document from the autosave file
    pub fn load_autosave() -> Option<CompositionDocument> {
        let path = Self::autosave_path()?;
        match Self::read_document(&path) {
            Ok(doc) => Some(doc),
            Err(LoadError::Io(_)) => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring autosave: {e}");
                None
            }
        }
    }

    pub fn read_document(path: &Path) -> Result<CompositionDocument, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Ok(CompositionDocument::from_json(&json)?)
    }

    /// Check if autosave file exists
    pub fn has_autosave() -> bool {
        Self::autosave_path().is_some_and(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::placement::{PlacementConfig, PlacementEngine};
    use shared::GridKind;

    #[test]
    fn test_save_and_read_back() {
        let catalog = test_catalog();
        let engine = PlacementEngine::new(&catalog, PlacementConfig::free());
        let mut c = CompositionState::new("Saved", 10);
        c.place(&engine, GridKind::Joins, 4, &join_key("90_deg", "stem"), None)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.json");
        c.save_to(&path).unwrap();

        let doc = CompositionState::read_document(&path).unwrap();
        assert_eq!(doc.metadata.name, "Saved");
        assert_eq!(doc.grids.joins.shapes[0].cell_index, 4);
    }

    #[test]
    fn test_read_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"metadata\":").unwrap();
        assert!(matches!(
            CompositionState::read_document(&path),
            Err(LoadError::MalformedDocument(_))
        ));
        assert!(matches!(
            CompositionState::read_document(&dir.path().join("missing.json")),
            Err(LoadError::Io(_))
        ));
    }
}
