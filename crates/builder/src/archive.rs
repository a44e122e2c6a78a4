//! Archive of saved letters plus word and sentence generators.
//!
//! The manifest lists composition files relative to its own directory. A
//! manifest that cannot be read falls back to `FALLBACK_FILES`; individual
//! documents that fail to load are skipped.

use std::path::{Path, PathBuf};

use rand::Rng;

use shared::{ArchiveManifest, CompositionDocument};

use crate::error::ArchiveError;
use crate::grid::GridSet;
use crate::placement::PlacementEngine;
use crate::serializer::{self, HydrationReport};

/// Files tried when the manifest is unavailable
pub const FALLBACK_FILES: [&str; 26] = [
    "a.json", "b.json", "c.json", "d.json", "e.json", "f.json", "g.json", "h.json", "i.json",
    "j.json", "k.json", "l.json", "m.json", "n.json", "o.json", "p.json", "q.json", "r.json",
    "s.json", "t.json", "u.json", "v.json", "w.json", "x.json", "y.json", "z.json",
];

/// Read a manifest, falling back to the fixed file list on any failure
pub fn load_manifest(path: &Path) -> ArchiveManifest {
    let parsed = std::fs::read_to_string(path)
        .map_err(ArchiveError::from)
        .and_then(|json| Ok(serde_json::from_str::<ArchiveManifest>(&json)?));
    match parsed {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!(path = %path.display(), "using fallback file list: {e}");
            ArchiveManifest {
                files: FALLBACK_FILES.iter().map(|f| f.to_string()).collect(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub document: CompositionDocument,
}

impl ArchiveEntry {
    pub fn name(&self) -> &str {
        &self.document.metadata.name
    }
}

/// Loaded compositions, in manifest order
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    /// Load every composition the manifest at `manifest_path` lists
    pub fn load(manifest_path: &Path) -> Result<Self, ArchiveError> {
        let manifest = load_manifest(manifest_path);
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        let mut entries = Vec::new();
        for file in &manifest.files {
            let path = base.join(file);
            let loaded = std::fs::read_to_string(&path)
                .map_err(crate::error::LoadError::from)
                .and_then(|json| serializer::parse(&json));
            match loaded {
                Ok(document) => entries.push(ArchiveEntry { path, document }),
                Err(e) => tracing::warn!(path = %path.display(), "skipping archive entry: {e}"),
            }
        }

        if entries.is_empty() {
            return Err(ArchiveError::Empty);
        }
        tracing::info!(
            listed = manifest.files.len(),
            loaded = entries.len(),
            "archive loaded"
        );
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose composition name matches `name`, ignoring case
    pub fn find(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries
            .iter()
            .find(|e| e.name().trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Hydrate an entry onto fresh grids for viewing
    pub fn view(entry: &ArchiveEntry, engine: &PlacementEngine<'_>) -> (GridSet, HydrationReport) {
        let mut grids = GridSet::new();
        let report = serializer::hydrate(&entry.document, &mut grids, engine);
        (grids, report)
    }

    /// `len` entries drawn uniformly, with repeats
    pub fn generate_word<R: Rng>(&self, len: usize, rng: &mut R) -> Result<Vec<&ArchiveEntry>, ArchiveError> {
        if self.entries.is_empty() {
            return Err(ArchiveError::Empty);
        }
        Ok((0..len)
            .map(|_| &self.entries[rng.random_range(0..self.entries.len())])
            .collect())
    }

    /// One word per requested length
    pub fn generate_sentence<R: Rng>(
        &self,
        word_lengths: &[usize],
        rng: &mut R,
    ) -> Result<Vec<Vec<&ArchiveEntry>>, ArchiveError> {
        word_lengths
            .iter()
            .map(|&len| self.generate_word(len, &mut *rng))
            .collect()
    }

    /// Entries named after each character of `text`; whitespace is skipped
    pub fn spell(&self, text: &str) -> Result<Vec<&ArchiveEntry>, ArchiveError> {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                let letter = c.to_string();
                self.find(&letter).ok_or(ArchiveError::MissingLetter(letter))
            })
            .collect()
    }
}
