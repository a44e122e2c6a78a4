use shared::{Category, ShapeKey, Texture};

use crate::error::PlaceError;

/// Current shape, texture and palette tab
#[derive(Debug, Clone)]
pub struct SelectionState {
    shape: Option<ShapeKey>,
    texture: Option<Texture>,
    /// Palette tab the user is browsing
    pub tab: Category,
    /// Version counter for selection changes
    pub version: u64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            shape: None,
            texture: None,
            tab: Category::Bodies,
            version: 0,
        }
    }
}

impl SelectionState {
    /// Select a shape; the palette follows its category
    pub fn select(&mut self, key: ShapeKey) {
        self.tab = key.category;
        self.shape = Some(key);
        self.version += 1;
    }

    pub fn shape(&self) -> Option<&ShapeKey> {
        self.shape.as_ref()
    }

    /// Selected shape, or `NothingSelected`
    pub fn require_shape(&self) -> Result<&ShapeKey, PlaceError> {
        self.shape.as_ref().ok_or(PlaceError::NothingSelected)
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: Option<Texture>) {
        self.texture = texture;
        self.version += 1;
    }

    /// Switch palette tab; drops a selection from another category
    pub fn set_tab(&mut self, tab: Category) {
        if self.tab != tab {
            self.tab = tab;
            if self.shape.as_ref().is_some_and(|k| k.category != tab) {
                self.shape = None;
            }
            self.version += 1;
        }
    }

    /// Clear shape and texture; keeps the tab
    pub fn clear(&mut self) {
        self.shape = None;
        self.texture = None;
        self.version += 1;
    }
}
