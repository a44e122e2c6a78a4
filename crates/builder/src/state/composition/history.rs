//! Undo/redo functionality

use super::CompositionState;

impl CompositionState {
    /// Undo last change; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.grids, prev);
        self.redo_stack.push(current);
        self.version += 1;
        true
    }

    /// Redo last undone change; false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.grids, next);
        self.undo_stack.push(current);
        self.version += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
