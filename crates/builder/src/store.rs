//! Composition store: opaque save/list/delete over documents.
//!
//! The store never interprets documents beyond their name, which feeds the
//! file name of file-backed entries.

use std::path::{Path, PathBuf};

use shared::{sanitize_file_name, CompositionDocument};

use crate::error::StoreError;

/// Document with the id it was stored under
#[derive(Debug, Clone, PartialEq)]
pub struct StoredComposition {
    pub id: String,
    pub document: CompositionDocument,
}

pub trait CompositionStore {
    /// Store a document; returns its new id
    fn save(&mut self, doc: &CompositionDocument) -> Result<String, StoreError>;

    /// Every stored document, ordered by id
    fn get_all(&self) -> Result<Vec<StoredComposition>, StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// One JSON file per document, named `<sanitized-name>-<uuid>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data dir
    pub fn in_data_dir() -> Option<Self> {
        directories::ProjectDirs::from("org", "freebuilder", "freebuilder")
            .map(|dirs| Self::new(dirs.data_dir().join("compositions")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl CompositionStore for FileStore {
    fn save(&mut self, doc: &CompositionDocument) -> Result<String, StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let id = format!(
            "{}-{}",
            sanitize_file_name(&doc.metadata.name),
            uuid::Uuid::new_v4().simple()
        );
        let path = self.path_for(&id)?;
        std::fs::write(&path, doc.to_json_pretty()?)?;
        tracing::info!(id = %id, path = %path.display(), "composition stored");
        Ok(id)
    }

    fn get_all(&self) -> Result<Vec<StoredComposition>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let json = std::fs::read_to_string(&path)?;
            match CompositionDocument::from_json(&json) {
                Ok(document) => entries.push(StoredComposition { id, document }),
                Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable composition: {e}"),
            }
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(id, "composition deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<StoredComposition>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CompositionStore for MemoryStore {
    fn save(&mut self, doc: &CompositionDocument) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.entries.push(StoredComposition {
            id: id.clone(),
            document: doc.clone(),
        });
        Ok(id)
    }

    fn get_all(&self) -> Result<Vec<StoredComposition>, StoreError> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_document;

    fn exercise(store: &mut dyn CompositionStore) {
        let a = store.save(&sample_document("First Letter")).unwrap();
        let b = store.save(&sample_document("Second")).unwrap();
        assert_ne!(a, b);

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|e| e.id == a && e.document.metadata.name == "First Letter"));

        store.delete(&a).unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
        assert!(matches!(store.delete(&a), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&mut FileStore::new(dir.path().join("store")));
    }

    #[test]
    fn test_file_names_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let id = store.save(&sample_document("My Glyph #3")).unwrap();
        assert!(id.starts_with("my_glyph_3-"), "{id}");
        assert!(dir.path().join(format!("{id}.json")).exists());
    }

    #[test]
    fn test_file_store_rejects_path_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(store.delete("../etc"), Err(StoreError::InvalidId(_))));
    }

    #[test]
    fn test_file_store_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.json"), "nope").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let mut store = FileStore::new(dir.path());
        store.save(&sample_document("ok")).unwrap();
        assert_eq!(store.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent"));
        assert!(store.get_all().unwrap().is_empty());
    }
}
