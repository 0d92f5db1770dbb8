//! WASM bindings for the editor
//!
//! Structured results (pages, selection, settings) cross the boundary as
//! JSON strings.

use crate::{
    Alignment, EmbeddedObject, Editor, HeaderFooterManager, LineMeasurer, PageGeometry,
    Selection,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(err: impl ToString) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

/// Selection payload for the JS shell
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionInfo {
    anchor: usize,
    active: usize,
    start: usize,
    end: usize,
    is_collapsed: bool,
}

impl From<Selection> for SelectionInfo {
    fn from(selection: Selection) -> Self {
        Self {
            anchor: selection.anchor,
            active: selection.active,
            start: selection.start(),
            end: selection.end(),
            is_collapsed: selection.is_collapsed(),
        }
    }
}

/// WASM-exposed editor wrapper
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
    measurer: LineMeasurer,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create a new editor with A4 pages and 50pt margins
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            editor: Editor::new(),
            measurer: LineMeasurer::default(),
        }
    }

    /// Create editor with custom page dimensions
    #[wasm_bindgen(js_name = withGeometry)]
    pub fn with_geometry(page_width: f32, page_height: f32, margin: f32) -> Self {
        let mut wasm = Self::new();
        wasm.editor.geometry = PageGeometry::new(page_width, page_height, margin);
        wasm
    }

    /// Insert text at current cursor position
    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.editor.insert_text(text).map(drop).map_err(js_error)
    }

    /// Insert a new paragraph (Enter key)
    #[wasm_bindgen(js_name = insertParagraph)]
    pub fn insert_paragraph(&mut self) -> Result<(), JsValue> {
        self.insert_text("\n")
    }

    #[wasm_bindgen(js_name = insertImage)]
    pub fn insert_image(&mut self, source: &str) -> Result<(), JsValue> {
        self.editor
            .insert_object(EmbeddedObject::image(source))
            .map(drop)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = insertTable)]
    pub fn insert_table(&mut self, rows: usize, cols: usize) -> Result<(), JsValue> {
        self.editor
            .insert_object(EmbeddedObject::table(rows, cols))
            .map(drop)
            .map_err(js_error)
    }

    /// Delete backward (backspace)
    #[wasm_bindgen(js_name = deleteBackward)]
    pub fn delete_backward(&mut self) -> Result<bool, JsValue> {
        self.editor
            .delete(true)
            .map(|result| result.is_some())
            .map_err(js_error)
    }

    /// Delete forward (delete key)
    #[wasm_bindgen(js_name = deleteForward)]
    pub fn delete_forward(&mut self) -> Result<bool, JsValue> {
        self.editor
            .delete(false)
            .map(|result| result.is_some())
            .map_err(js_error)
    }

    /// Move cursor by grapheme clusters
    #[wasm_bindgen(js_name = moveCaret)]
    pub fn move_caret(&mut self, delta: i32, extend_selection: bool) {
        self.editor.move_caret(delta as isize, extend_selection);
    }

    pub fn select(&mut self, anchor: usize, active: usize) -> Result<(), JsValue> {
        self.editor.select(anchor, active).map_err(js_error)
    }

    /// Select all text
    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) -> Result<(), JsValue> {
        let len = self.editor.document.len();
        self.select(0, len)
    }

    /// Get the selection (JSON)
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<String, JsValue> {
        to_json(&SelectionInfo::from(self.editor.selection()))
    }

    #[wasm_bindgen(js_name = getSelectedText)]
    pub fn get_selected_text(&self) -> String {
        self.editor.selected_text()
    }

    /// Apply a style string to the selection and future typing
    #[wasm_bindgen(js_name = applyStyle)]
    pub fn apply_style(&mut self, style: &str) -> Result<(), JsValue> {
        self.editor.apply_style(style).map(drop).map_err(js_error)
    }

    /// Align the caret's paragraph: "left", "center", "right" or "justify"
    #[wasm_bindgen(js_name = setAlignment)]
    pub fn set_alignment(&mut self, keyword: &str) -> Result<(), JsValue> {
        let alignment = Alignment::from_keyword(keyword)
            .ok_or_else(|| js_error(format!("unknown alignment {:?}", keyword)))?;
        self.editor
            .set_alignment(alignment)
            .map(drop)
            .map_err(js_error)
    }

    /// Select the next match; false when there is none
    #[wasm_bindgen(js_name = findNext)]
    pub fn find_next(&mut self, needle: &str) -> Result<bool, JsValue> {
        self.editor
            .find_next(needle)
            .map(|hit| hit.is_some())
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = replaceSelection)]
    pub fn replace_selection(&mut self, needle: &str, replacement: &str) -> Result<bool, JsValue> {
        self.editor
            .replace_selection(needle, replacement)
            .map(|hit| hit.is_some())
            .map_err(js_error)
    }

    /// Replace every match; returns the number replaced
    #[wasm_bindgen(js_name = replaceAll)]
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize, JsValue> {
        self.editor
            .replace_all(needle, replacement)
            .map_err(js_error)
    }

    /// Undo last operation
    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.editor.undo().map_err(js_error)
    }

    /// Redo last undone operation
    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.editor.redo().map_err(js_error)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.editor.undo_manager.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.editor.undo_manager.can_redo()
    }

    /// Get full document text
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        self.editor.text()
    }

    #[wasm_bindgen(js_name = getTextInRange)]
    pub fn get_text_in_range(&self, start: usize, end: usize) -> Result<String, JsValue> {
        self.editor
            .document
            .text_in_range(start, end)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = getWordCount)]
    pub fn get_word_count(&self) -> usize {
        self.editor.word_count()
    }

    #[wasm_bindgen(js_name = getCharCount)]
    pub fn get_char_count(&self) -> usize {
        self.editor.char_count()
    }

    /// Paginate with the built-in measurer (JSON array of pages)
    #[wasm_bindgen(js_name = getPages)]
    pub fn get_pages(&self) -> Result<String, JsValue> {
        to_json(&self.editor.paginate(&self.measurer))
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.editor.paginate(&self.measurer).len()
    }

    /// Replace the measurer configuration (JSON)
    #[wasm_bindgen(js_name = setMeasurer)]
    pub fn set_measurer(&mut self, json: &str) -> Result<(), JsValue> {
        self.measurer = serde_json::from_str(json).map_err(js_error)?;
        Ok(())
    }

    /// Page geometry (JSON)
    #[wasm_bindgen(js_name = getGeometry)]
    pub fn get_geometry(&self) -> Result<String, JsValue> {
        to_json(&self.editor.geometry)
    }

    #[wasm_bindgen(js_name = setGeometry)]
    pub fn set_geometry(&mut self, json: &str) -> Result<(), JsValue> {
        self.editor.geometry = serde_json::from_str(json).map_err(js_error)?;
        Ok(())
    }

    /// Header/footer settings (JSON)
    #[wasm_bindgen(js_name = getHeaderFooter)]
    pub fn get_header_footer(&self) -> Result<String, JsValue> {
        to_json(&self.editor.headers)
    }

    #[wasm_bindgen(js_name = setHeaderFooter)]
    pub fn set_header_footer(&mut self, json: &str) -> Result<(), JsValue> {
        let headers: HeaderFooterManager = serde_json::from_str(json).map_err(js_error)?;
        self.editor.headers = headers;
        Ok(())
    }

    #[wasm_bindgen(js_name = setHeader)]
    pub fn set_header(&mut self, text: &str, is_first_page: bool) {
        self.editor.headers.set_header(text, is_first_page);
    }

    #[wasm_bindgen(js_name = setFooter)]
    pub fn set_footer(&mut self, text: &str, is_first_page: bool) {
        self.editor.headers.set_footer(text, is_first_page);
    }

    #[wasm_bindgen(js_name = clearHeaderFooter)]
    pub fn clear_header_footer(&mut self) {
        self.editor.headers.clear();
    }

    #[wasm_bindgen(js_name = newDocument)]
    pub fn new_document(&mut self) {
        self.editor.new_document();
    }

    /// Replace the document with plain text
    #[wasm_bindgen(js_name = loadPlainText)]
    pub fn load_plain_text(&mut self, text: &str) -> Result<(), JsValue> {
        self.editor
            .load_plain_text(text.as_bytes())
            .map_err(js_error)
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}
