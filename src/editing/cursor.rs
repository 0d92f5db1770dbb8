//! Caret and selection in the flat offset space

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Text selection (anchor + active point).
///
/// A collapsed selection is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// The anchor point (fixed during extension)
    pub anchor: usize,
    /// The active point (moves during extension)
    pub active: usize,
}

impl Selection {
    /// Create a new selection
    pub fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    /// Create a collapsed selection (caret)
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            active: offset,
        }
    }

    /// Check if selection is collapsed (no text selected)
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.active
    }

    /// Ordered `start..end`
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.active)
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Move the caret, dropping any selection
    pub fn move_to(&mut self, offset: usize) {
        self.anchor = offset;
        self.active = offset;
    }

    /// Extend selection to a new active position
    pub fn extend_to(&mut self, offset: usize) {
        self.active = offset;
    }

    /// Check if an offset is within the selection
    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }

    /// Clamp both ends to a document length
    pub fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.active = self.active.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_ordered() {
        let sel = Selection::new(10, 5);
        assert_eq!(sel.range(), 5..10);
        assert_eq!(sel.len(), 5);
        assert!(sel.contains(5));
        assert!(!sel.contains(10));
    }

    #[test]
    fn test_selection_collapsed() {
        let mut sel = Selection::collapsed(5);
        assert!(sel.is_collapsed());
        sel.extend_to(8);
        assert!(!sel.is_collapsed());
        sel.move_to(2);
        assert_eq!(sel, Selection::collapsed(2));
    }

    #[test]
    fn test_clamp() {
        let mut sel = Selection::new(3, 40);
        sel.clamp(12);
        assert_eq!(sel.range(), 3..12);
    }
}
