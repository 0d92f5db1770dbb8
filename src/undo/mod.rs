//! Undo/Redo system with transaction support

use crate::document::Document;
use crate::editing::{EditOp, EditResult, Selection};
use crate::error::Result;

/// Default number of steps kept on the undo stack
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Result of an undo/redo operation
#[derive(Debug, Clone)]
pub struct UndoResult {
    /// Selection to restore in the editor
    pub selection: Selection,
    /// What the replayed operations changed
    pub edit: EditResult,
}

/// A single transaction that can be undone/redone
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Description of the operation
    pub description: String,
    /// Forward operations
    pub forward_ops: Vec<EditOp>,
    /// Reverse operations (for undo)
    pub reverse_ops: Vec<EditOp>,
    /// Selection state before the transaction
    pub selection_before: Selection,
    /// Timestamp for grouping (milliseconds)
    pub timestamp: u64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(description: impl Into<String>, selection_before: Selection) -> Self {
        Self {
            description: description.into(),
            forward_ops: Vec::new(),
            reverse_ops: Vec::new(),
            selection_before,
            timestamp: current_timestamp(),
        }
    }

    /// Check if this transaction is empty
    pub fn is_empty(&self) -> bool {
        self.forward_ops.is_empty()
    }

    // Contiguous single-line inserts in one style: first offset, total
    // length and the shared style.
    fn typing_run(&self) -> Option<(usize, usize, &str)> {
        let mut run: Option<(usize, usize, &str)> = None;
        for op in &self.forward_ops {
            let EditOp::InsertText {
                offset,
                text,
                style,
            } = op
            else {
                return None;
            };
            if text.contains('\n') {
                return None;
            }
            let len = text.chars().count();
            run = match run {
                None => Some((*offset, len, style)),
                Some((start, total, s)) if start + total == *offset && s == style => {
                    Some((start, total + len, s))
                }
                Some(_) => return None,
            };
        }
        run
    }
}

/// Undo/Redo manager
pub struct UndoManager {
    /// Stack of undoable transactions
    undo_stack: Vec<Transaction>,
    /// Stack of redoable transactions
    redo_stack: Vec<Transaction>,
    /// Maximum history depth
    max_depth: usize,
    /// Current transaction being built
    pending: Option<Transaction>,
    /// Time window for merging transactions (ms)
    merge_window_ms: u64,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            pending: None,
            merge_window_ms: 500,
        }
    }

    /// Set the typing merge window. Zero disables merging.
    pub fn set_merge_window(&mut self, window_ms: u64) {
        self.merge_window_ms = window_ms;
    }

    pub fn merge_window(&self) -> u64 {
        self.merge_window_ms
    }

    /// Begin a new transaction
    pub fn begin_transaction(&mut self, description: &str, selection: Selection) {
        self.pending = Some(Transaction::new(description, selection));
    }

    /// Record an edit within the current transaction
    pub fn record_edit(&mut self, forward: EditOp, reverse: EditOp) {
        if let Some(ref mut txn) = self.pending {
            txn.forward_ops.push(forward);
            txn.reverse_ops.push(reverse);
        }
    }

    /// Drop the pending transaction without recording it
    pub fn abort(&mut self) {
        self.pending = None;
    }

    /// Commit the current transaction
    pub fn commit(&mut self) {
        if let Some(txn) = self.pending.take() {
            if txn.is_empty() {
                return;
            }

            // Clear redo stack on new edit
            self.redo_stack.clear();

            if self.should_merge(&txn) {
                self.merge_with_last(txn);
            } else {
                self.undo_stack.push(txn);
            }

            // Enforce depth limit
            if self.undo_stack.len() > self.max_depth {
                let excess = self.undo_stack.len() - self.max_depth;
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Consecutive typing merges when it continues the previous run in the
    /// same style within the merge window.
    fn should_merge(&self, txn: &Transaction) -> bool {
        let Some(last) = self.undo_stack.last() else {
            return false;
        };
        let (Some((last_offset, last_len, last_style)), Some((offset, _, style))) =
            (last.typing_run(), txn.typing_run())
        else {
            return false;
        };

        last_offset + last_len == offset
            && last_style == style
            && txn.timestamp.saturating_sub(last.timestamp) < self.merge_window_ms
    }

    /// Merge transaction with last one
    fn merge_with_last(&mut self, txn: Transaction) {
        if let Some(last) = self.undo_stack.last_mut() {
            last.forward_ops.extend(txn.forward_ops);
            // Reverse ops are replayed back to front on undo
            last.reverse_ops.extend(txn.reverse_ops);
            last.timestamp = txn.timestamp;
        }
    }

    /// Undo the last transaction
    pub fn undo(&mut self, document: &mut Document) -> Result<Option<UndoResult>> {
        let Some(txn) = self.undo_stack.pop() else {
            return Ok(None);
        };

        let reverse = EditOp::transaction(txn.reverse_ops.iter().rev().cloned().collect());
        let edit = match document.apply_edit(reverse) {
            Ok(edit) => edit,
            Err(err) => {
                self.undo_stack.push(txn);
                return Err(err);
            }
        };
        log::debug!("undo: {}", txn.description);

        let result = UndoResult {
            selection: txn.selection_before,
            edit,
        };

        // Move to redo stack
        self.redo_stack.push(txn);

        Ok(Some(result))
    }

    /// Redo the last undone transaction
    pub fn redo(&mut self, document: &mut Document) -> Result<Option<UndoResult>> {
        let Some(txn) = self.redo_stack.pop() else {
            return Ok(None);
        };

        let forward = EditOp::transaction(txn.forward_ops.clone());
        let edit = match document.apply_edit(forward) {
            Ok(edit) => edit,
            Err(err) => {
                self.redo_stack.push(txn);
                return Err(err);
            }
        };
        log::debug!("redo: {}", txn.description);

        let result = UndoResult {
            selection: Selection::collapsed(edit.caret),
            edit,
        };

        // Move to undo stack
        self.undo_stack.push(txn);

        Ok(Some(result))
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|txn| txn.description.as_str())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
