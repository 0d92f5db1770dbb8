//! Edit operations and results

use crate::document::{EmbeddedObject, Fragment};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An atomic, reversible edit expressed in flat offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Insert text with an explicit style
    InsertText {
        offset: usize,
        text: String,
        style: String,
    },
    /// Insert one embedded object
    InsertObject {
        offset: usize,
        object: EmbeddedObject,
    },
    /// Insert a styled fragment (used to restore deleted content)
    InsertFragment { offset: usize, fragment: Fragment },
    /// Delete `[start, end)`
    Delete { start: usize, end: usize },
    /// Restyle every unit in `[start, end)`
    SetStyle {
        start: usize,
        end: usize,
        style: String,
    },
    /// Replace a paragraph's style
    SetParagraphStyle { index: usize, style: String },
    /// A composite transaction applied all-or-nothing
    Transaction { ops: Vec<EditOp> },
}

impl EditOp {
    /// Create an insert operation
    pub fn insert(offset: usize, text: impl Into<String>, style: impl Into<String>) -> Self {
        Self::InsertText {
            offset,
            text: text.into(),
            style: style.into(),
        }
    }

    /// Create a delete operation
    pub fn delete(start: usize, end: usize) -> Self {
        Self::Delete { start, end }
    }

    /// Create a restyle operation
    pub fn set_style(start: usize, end: usize, style: impl Into<String>) -> Self {
        Self::SetStyle {
            start,
            end,
            style: style.into(),
        }
    }

    /// Create a transaction
    pub fn transaction(ops: Vec<EditOp>) -> Self {
        Self::Transaction { ops }
    }

    /// Caret offset after this operation has been applied
    pub fn caret_after(&self) -> usize {
        match self {
            EditOp::InsertText { offset, text, .. } => offset + text.chars().count(),
            EditOp::InsertObject { offset, .. } => offset + 1,
            EditOp::InsertFragment { offset, fragment } => offset + fragment.len(),
            EditOp::Delete { start, .. } => *start,
            EditOp::SetStyle { end, .. } => *end,
            EditOp::SetParagraphStyle { .. } => 0,
            EditOp::Transaction { ops } => ops.last().map(EditOp::caret_after).unwrap_or(0),
        }
    }

    /// Get the affected range of this operation, in pre-edit offsets
    pub fn affected_range(&self) -> (usize, usize) {
        match self {
            EditOp::InsertText { offset, text, .. } => (*offset, offset + text.chars().count()),
            EditOp::InsertObject { offset, .. } => (*offset, offset + 1),
            EditOp::InsertFragment { offset, fragment } => (*offset, offset + fragment.len()),
            EditOp::Delete { start, end } | EditOp::SetStyle { start, end, .. } => (*start, *end),
            EditOp::SetParagraphStyle { .. } => (0, 0),
            EditOp::Transaction { ops } => {
                let mut min_start = usize::MAX;
                let mut max_end = 0;
                for op in ops {
                    let (s, e) = op.affected_range();
                    min_start = min_start.min(s);
                    max_end = max_end.max(e);
                }
                if min_start == usize::MAX {
                    (0, 0)
                } else {
                    (min_start, max_end)
                }
            }
        }
    }
}

/// Result of applying an edit operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// New document version after this edit
    pub version: u64,
    /// Indices (after the edit) of paragraphs whose content or style changed
    pub affected_paragraphs: SmallVec<[usize; 4]>,
    /// Number of paragraphs created
    pub created_paragraphs: usize,
    /// Number of paragraphs removed by merging
    pub removed_paragraphs: usize,
    /// Caret offset after the edit
    pub caret: usize,
}

impl EditResult {
    /// Check if any paragraphs were affected
    pub fn has_changes(&self) -> bool {
        !self.affected_paragraphs.is_empty()
            || self.created_paragraphs > 0
            || self.removed_paragraphs > 0
    }

    /// Fold a later result into this one
    pub(crate) fn absorb(&mut self, later: EditResult) {
        for index in later.affected_paragraphs {
            if !self.affected_paragraphs.contains(&index) {
                self.affected_paragraphs.push(index);
            }
        }
        self.created_paragraphs += later.created_paragraphs;
        self.removed_paragraphs += later.removed_paragraphs;
        self.version = later.version;
        self.caret = later.caret;
    }
}
