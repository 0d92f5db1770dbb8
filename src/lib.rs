//! richpage: the content model of a paginated rich-text editor
//!
//! This crate provides:
//! - A document of paragraphs holding styled text runs and embedded objects,
//!   addressed through one flat offset space
//! - Reversible edit operations with undo/redo and typing merge
//! - Header/footer composition with Arabic, Roman and letter page numbers
//! - Greedy pagination with an injected paragraph height measurer
//! - Plain-text import/export and a WASM bridge for a browser shell

pub mod convert;
pub mod document;
pub mod editing;
pub mod error;
pub mod header_footer;
pub mod layout;
pub mod undo;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmEditor;

// Re-export primary types
pub use convert::{read_plain_text, write_plain_text, ExportSummary};
pub use document::{Document, EmbeddedObject, Fragment, ObjectKind, Paragraph, Segment};
pub use editing::{EditOp, EditResult, Selection};
pub use error::{Error, Result};
pub use header_footer::{Alignment, HeaderFooterManager, PageNumberFormat, PageNumberPosition};
pub use layout::{
    paginate, LineMeasurer, PageDescriptor, PageGeometry, Paginator, ParagraphMeasurer,
};
pub use undo::UndoManager;

use std::io::{Read, Write};

/// The main editor state combining all components
pub struct Editor {
    pub document: Document,
    pub headers: HeaderFooterManager,
    pub geometry: PageGeometry,
    pub undo_manager: UndoManager,
    selection: Selection,
    /// Style given to typed text
    typing_style: String,
    /// Where the next `find_next` starts
    search_from: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with an empty document and A4 pages
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            headers: HeaderFooterManager::new(),
            geometry: PageGeometry::default(),
            undo_manager: UndoManager::default(),
            selection: Selection::default(),
            typing_style: String::new(),
            search_from: 0,
        }
    }

    /// Create an editor with initial text content
    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.document = Document::from_plain_text(text);
        editor
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Flattened text under the selection
    pub fn selected_text(&self) -> String {
        self.document
            .text_in_range(self.selection.start(), self.selection.end())
            .unwrap_or_default()
    }

    /// Select `[anchor, active]`; both ends must lie inside the document
    pub fn select(&mut self, anchor: usize, active: usize) -> Result<()> {
        let len = self.document.len();
        for offset in [anchor, active] {
            if offset > len {
                return Err(Error::OutOfRange { offset, len });
            }
        }
        self.selection = Selection::new(anchor, active);
        Ok(())
    }

    /// Move the caret by whole grapheme clusters
    pub fn move_caret(&mut self, delta: isize, extend_selection: bool) {
        let offset = self.document.move_by_graphemes(self.selection.active, delta);
        if extend_selection {
            self.selection.extend_to(offset);
        } else {
            self.selection.move_to(offset);
        }
    }

    pub fn typing_style(&self) -> &str {
        &self.typing_style
    }

    pub fn set_typing_style(&mut self, style: impl Into<String>) {
        self.typing_style = style.into();
    }

    /// Insert text at the caret, replacing any selection
    pub fn insert_text(&mut self, text: &str) -> Result<EditResult> {
        if text.is_empty() && self.selection.is_collapsed() {
            return Ok(self.unchanged());
        }
        let op = EditOp::insert(self.selection.start(), text, self.typing_style.clone());
        let result = self.record("insert", self.replacing_selection(op))?;
        self.selection = Selection::collapsed(result.caret);
        Ok(result)
    }

    /// Insert an embedded object at the caret, replacing any selection
    pub fn insert_object(&mut self, object: EmbeddedObject) -> Result<EditResult> {
        let op = EditOp::InsertObject {
            offset: self.selection.start(),
            object,
        };
        let result = self.record("insert object", self.replacing_selection(op))?;
        self.selection = Selection::collapsed(result.caret);
        Ok(result)
    }

    /// Delete the selection, or one grapheme cluster next to the caret
    pub fn delete(&mut self, backward: bool) -> Result<Option<EditResult>> {
        let (start, end) = if !self.selection.is_collapsed() {
            (self.selection.start(), self.selection.end())
        } else {
            let pos = self.selection.active;
            if backward {
                if pos == 0 {
                    return Ok(None);
                }
                (self.document.prev_grapheme_offset(pos), pos)
            } else {
                let next = self.document.next_grapheme_offset(pos);
                if next == pos {
                    return Ok(None);
                }
                (pos, next)
            }
        };

        let result = self.record("delete", EditOp::delete(start, end))?;
        self.selection = Selection::collapsed(start);
        Ok(Some(result))
    }

    /// Style the selection and make `style` the typing style.
    ///
    /// With a collapsed selection only the typing style changes.
    pub fn apply_style(&mut self, style: &str) -> Result<EditResult> {
        self.typing_style = style.to_string();
        if self.selection.is_collapsed() {
            return Ok(self.unchanged());
        }
        let op = EditOp::set_style(self.selection.start(), self.selection.end(), style);
        self.record("style", op)
    }

    /// Align the paragraph holding the caret
    pub fn set_alignment(&mut self, alignment: Alignment) -> Result<EditResult> {
        let index = self.document.paragraph_at_offset(self.selection.active)?;
        let op = EditOp::SetParagraphStyle {
            index,
            style: alignment.paragraph_style(),
        };
        self.record("align", op)
    }

    /// Select the next match of `needle` after the previous hit, wrapping
    /// once to the start of the document.
    pub fn find_next(&mut self, needle: &str) -> Result<Option<Selection>> {
        let from = self.search_from.min(self.document.len());
        let Some(at) = self.document.find(needle, from, true)? else {
            log::debug!("no match for {:?}", needle);
            return Ok(None);
        };
        self.search_from = at + 1;
        self.selection = Selection::new(at, at + needle.chars().count());
        Ok(Some(self.selection))
    }

    /// Replace the selection if it is exactly `needle`, then find the next
    /// match.
    pub fn replace_selection(
        &mut self,
        needle: &str,
        replacement: &str,
    ) -> Result<Option<Selection>> {
        if !needle.is_empty() && !self.selection.is_collapsed() && self.selected_text() == needle
        {
            let start = self.selection.start();
            let style = self
                .document
                .style_at(start)
                .unwrap_or(self.typing_style.as_str())
                .to_string();
            let mut ops = vec![EditOp::delete(start, self.selection.end())];
            if !replacement.is_empty() {
                ops.push(EditOp::insert(start, replacement, style));
            }
            self.record("replace", EditOp::transaction(ops))?;
            let end = start + replacement.chars().count();
            self.selection = Selection::collapsed(end);
            self.search_from = end;
        }
        self.find_next(needle)
    }

    /// Replace every occurrence as one undoable step
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize> {
        let Some((count, op)) = self.document.replace_all_op(needle, replacement)? else {
            return Ok(0);
        };
        self.record("replace all", op)?;
        self.selection.clamp(self.document.len());
        self.search_from = 0;
        log::debug!("replaced {} occurrence(s) of {:?}", count, needle);
        Ok(count)
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> Result<bool> {
        match self.undo_manager.undo(&mut self.document)? {
            Some(result) => {
                self.selection = result.selection;
                self.selection.clamp(self.document.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> Result<bool> {
        match self.undo_manager.redo(&mut self.document)? {
            Some(result) => {
                self.selection = result.selection;
                self.selection.clamp(self.document.len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Lay the document out into pages
    pub fn paginate<M: ParagraphMeasurer + ?Sized>(&self, measurer: &M) -> Vec<PageDescriptor> {
        paginate(&self.document, self.geometry, &self.headers, measurer)
    }

    pub fn word_count(&self) -> usize {
        self.document.word_count()
    }

    pub fn char_count(&self) -> usize {
        self.document.char_count()
    }

    /// Get document text
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Start over with an empty document and no history.
    ///
    /// Header and footer content is cleared; numbering format and position
    /// carry over.
    pub fn new_document(&mut self) {
        self.replace_document(Document::new());
        self.headers.clear();
    }

    /// Replace the document with plain text read from `reader`
    pub fn load_plain_text<R: Read>(&mut self, reader: R) -> Result<()> {
        let document = read_plain_text(reader)?;
        self.replace_document(document);
        Ok(())
    }

    /// Write the document as plain text
    pub fn save_plain_text<W: Write>(&self, writer: W) -> Result<ExportSummary> {
        write_plain_text(&self.document, writer)
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.undo_manager.clear();
        self.selection = Selection::default();
        self.search_from = 0;
    }

    // Prefix a delete of the selected range when something is selected.
    fn replacing_selection(&self, op: EditOp) -> EditOp {
        if self.selection.is_collapsed() {
            op
        } else {
            EditOp::transaction(vec![
                EditOp::delete(self.selection.start(), self.selection.end()),
                op,
            ])
        }
    }

    // Apply `op` and record it as one undo step.
    fn record(&mut self, description: &str, op: EditOp) -> Result<EditResult> {
        self.undo_manager
            .begin_transaction(description, self.selection);
        match self.document.apply_with_reverse(op.clone()) {
            Ok((result, reverse)) => {
                self.undo_manager.record_edit(op, reverse);
                self.undo_manager.commit();
                Ok(result)
            }
            Err(err) => {
                self.undo_manager.abort();
                Err(err)
            }
        }
    }

    fn unchanged(&self) -> EditResult {
        EditResult {
            version: self.document.version(),
            caret: self.selection.active,
            ..Default::default()
        }
    }
}
