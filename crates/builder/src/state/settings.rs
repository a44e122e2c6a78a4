//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hover::HoverPolicy;
use crate::placement::PlacementConfig;

/// Editing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    /// Shapes go anywhere their footprint fits
    #[default]
    Free,
    /// Every placement must satisfy the connection grammar
    Constrained,
}

impl EditorMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorMode::Free => "Free",
            EditorMode::Constrained => "Constrained",
        }
    }

    pub fn is_constrained(&self) -> bool {
        matches!(self, EditorMode::Constrained)
    }
}

fn default_undo_limit() -> usize {
    100
}

fn default_cell_size() -> f64 {
    100.0
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderSettings {
    #[serde(default)]
    pub mode: EditorMode,
    /// Force clearing on every placement; follows the mode when unset
    #[serde(default)]
    pub strict_clearing: Option<bool>,
    /// Write the composition to the data dir after every edit
    #[serde(default)]
    pub autosave: bool,
    /// Maximum undo depth
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
    /// Edge of one serifs-grid cell in layout units
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            mode: EditorMode::Free,
            strict_clearing: None,
            autosave: false,
            undo_limit: default_undo_limit(),
            cell_size: default_cell_size(),
        }
    }
}

impl BuilderSettings {
    /// Placement engine switches derived from mode and overrides
    pub fn placement_config(&self) -> PlacementConfig {
        let constrained = self.mode.is_constrained();
        PlacementConfig {
            constrained,
            strict_clearing: self.strict_clearing.unwrap_or(constrained),
        }
    }

    pub fn hover_policy(&self) -> HoverPolicy {
        HoverPolicy::for_mode(self.mode.is_constrained())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "freebuilder", "freebuilder")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config dir, or defaults if missing or unreadable
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let json = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings: {e}");
                None
            }
        }
    }

    /// Save settings to the config dir
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!(path = %path.display(), "failed to save settings: {e}");
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
