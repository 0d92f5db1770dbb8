//! Document model: paragraphs of styled text runs and embedded objects
//!
//! All public operations speak the flat offset space: every character of a
//! text run is one unit, every embedded object is one unit, and every
//! paragraph boundary is one unit. Offsets are translated internally to a
//! (paragraph, intra-paragraph offset) pair by a linear scan.

mod paragraph;
mod search;
mod segment;

pub use paragraph::Paragraph;
pub use segment::{EmbeddedObject, ObjectKind, Segment, OBJECT_REPLACEMENT_CHAR};

use crate::editing::{EditOp, EditResult};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Character used for a paragraph boundary in flattened text
pub const PARAGRAPH_SEPARATOR: char = '\n';

/// A styled copy of a document range, paragraph styles included.
///
/// A fragment always holds at least one paragraph; `n` paragraphs span
/// `n - 1` boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FragmentData")]
pub struct Fragment {
    paragraphs: Vec<Paragraph>,
}

#[derive(Deserialize)]
struct FragmentData {
    paragraphs: Vec<Paragraph>,
}

impl From<FragmentData> for Fragment {
    fn from(data: FragmentData) -> Self {
        Fragment::new(data.paragraphs)
    }
}

impl Fragment {
    /// Build a fragment; an empty list becomes one empty paragraph
    pub fn new(mut paragraphs: Vec<Paragraph>) -> Self {
        if paragraphs.is_empty() {
            paragraphs.push(Paragraph::new());
        }
        Self { paragraphs }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Length in the flat offset space
    pub fn len(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::len).sum::<usize>() + self.paragraphs.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened text of the fragment
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, para) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                out.push(PARAGRAPH_SEPARATOR);
            }
            para.push_text(&mut out);
        }
        out
    }
}

/// The main document structure
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Never empty
    paragraphs: Vec<Paragraph>,
    /// Monotonic version counter
    #[serde(skip)]
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A document holding exactly the fragment's paragraphs
impl From<Fragment> for Document {
    fn from(fragment: Fragment) -> Self {
        Self {
            paragraphs: fragment.paragraphs,
            version: 0,
        }
    }
}

/// Content equality; the version counter is ignored.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.paragraphs == other.paragraphs
    }
}

impl Eq for Document {}

impl Document {
    /// Create a new empty document (one empty paragraph)
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
            version: 0,
        }
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total length in the flat offset space
    pub fn len(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::len).sum::<usize>() + self.paragraphs.len() - 1
    }

    /// True when the document holds no content at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of embedded objects in the document
    pub fn object_count(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::object_count).sum()
    }

    /// Flat-offset range of a paragraph's content (separator excluded)
    pub fn paragraph_range(&self, index: usize) -> Result<Range<usize>> {
        if index >= self.paragraphs.len() {
            return Err(Error::ParagraphOutOfRange {
                index,
                count: self.paragraphs.len(),
            });
        }
        let start: usize = self.paragraphs[..index].iter().map(|p| p.len() + 1).sum();
        Ok(start..start + self.paragraphs[index].len())
    }

    /// Index of the paragraph containing `offset`.
    ///
    /// The offset just before a separator belongs to the paragraph it ends.
    pub fn paragraph_at_offset(&self, offset: usize) -> Result<usize> {
        self.locate(offset).map(|(index, _)| index)
    }

    /// Style of the unit at `offset`; `None` at a separator or the end
    pub fn style_at(&self, offset: usize) -> Option<&str> {
        let (index, at) = self.locate(offset).ok()?;
        self.paragraphs[index].segment_at(at).map(Segment::style)
    }

    /// The full flattened text
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, para) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                out.push(PARAGRAPH_SEPARATOR);
            }
            para.push_text(&mut out);
        }
        out
    }

    /// Flattened text of `[start, end)`.
    ///
    /// Objects become U+FFFC and paragraph boundaries `'\n'`, so the result
    /// has exactly `end - start` characters.
    pub fn text_in_range(&self, start: usize, end: usize) -> Result<String> {
        self.check_range(start, end)?;
        Ok(self.text().chars().skip(start).take(end - start).collect())
    }

    /// Character count, paragraph boundaries included
    pub fn char_count(&self) -> usize {
        self.len()
    }

    /// Number of whitespace-separated tokens in the flattened text
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    /// Offset after the grapheme cluster that follows `offset`
    pub fn next_grapheme_offset(&self, offset: usize) -> usize {
        self.move_by_graphemes(offset, 1)
    }

    /// Offset at the start of the grapheme cluster before `offset`
    pub fn prev_grapheme_offset(&self, offset: usize) -> usize {
        self.move_by_graphemes(offset, -1)
    }

    /// Move `delta` grapheme clusters from `offset`, stopping at either end
    /// of the document.
    pub fn move_by_graphemes(&self, offset: usize, delta: isize) -> usize {
        if delta == 0 {
            return offset;
        }
        let text = self.text();
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        boundaries.push(0);
        let mut pos = 0;
        for grapheme in text.graphemes(true) {
            pos += grapheme.chars().count();
            boundaries.push(pos);
        }

        let steps = delta.unsigned_abs();
        if delta > 0 {
            let after = boundaries.partition_point(|&b| b <= offset);
            boundaries
                .get(after.saturating_add(steps - 1))
                .or(boundaries.last())
                .copied()
                .unwrap_or(offset)
        } else {
            let before = boundaries.partition_point(|&b| b < offset);
            if before == 0 {
                return 0;
            }
            boundaries[before.saturating_sub(steps)]
        }
    }

    /// Insert text with an explicit style.
    ///
    /// `'\n'` starts a new paragraph carrying the current paragraph's style.
    pub fn insert_text(&mut self, offset: usize, text: &str, style: &str) -> Result<()> {
        let (index, _) = self.locate(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        let para_style = self.paragraphs[index].style().to_string();
        let paragraphs = text
            .split(PARAGRAPH_SEPARATOR)
            .map(|line| {
                Paragraph::from_segments(para_style.clone(), vec![Segment::text(line, style)])
            })
            .collect();
        log::trace!("insert_text at {} ({} chars)", offset, text.chars().count());
        self.splice_fragment(offset, Fragment::new(paragraphs))
    }

    /// Insert one embedded object at `offset`
    pub fn insert_object(&mut self, offset: usize, object: EmbeddedObject) -> Result<()> {
        let (index, at) = self.locate(offset)?;
        log::trace!("insert_object {:?} at {}", object.kind, offset);
        self.paragraphs[index].insert_segments(at, vec![Segment::from(object)]);
        self.version += 1;
        Ok(())
    }

    /// Insert a styled fragment at `offset`
    pub fn insert_fragment(&mut self, offset: usize, fragment: Fragment) -> Result<()> {
        self.locate(offset)?;
        self.splice_fragment(offset, fragment)
    }

    fn splice_fragment(&mut self, offset: usize, fragment: Fragment) -> Result<()> {
        let (index, at) = self.locate(offset)?;
        let mut incoming = fragment.paragraphs;

        if incoming.len() == 1 {
            let only = incoming.remove(0);
            self.paragraphs[index].insert_segments(at, only.into_segments());
        } else {
            let tail = self.paragraphs[index].split_off(at);
            let first = incoming.remove(0);
            self.paragraphs[index].append(first.into_segments());
            if let Some(last) = incoming.last_mut() {
                last.append(tail);
            }
            let at_index = index + 1;
            self.paragraphs.splice(at_index..at_index, incoming);
        }

        self.version += 1;
        Ok(())
    }

    /// Remove `[start, end)`, merging paragraphs when the range spans them.
    ///
    /// The merged paragraph keeps the earlier paragraph's style.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        let (first, a) = self.locate(start)?;
        let (last, b) = self.locate(end)?;
        log::trace!("delete_range {}..{}", start, end);

        if first == last {
            self.paragraphs[first].remove_range(a, b);
        } else {
            let tail = self.paragraphs[last].split_off(b);
            let head_len = self.paragraphs[first].len();
            self.paragraphs[first].remove_range(a, head_len);
            self.paragraphs[first].append(tail);
            self.paragraphs.drain(first + 1..=last);
        }

        self.version += 1;
        Ok(())
    }

    /// Overwrite the style of every text unit and object in `[start, end)`.
    ///
    /// Idempotent; an empty range is a no-op.
    pub fn set_style(&mut self, start: usize, end: usize, style: &str) -> Result<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        let (first, a) = self.locate(start)?;
        let (last, b) = self.locate(end)?;
        log::trace!("set_style {}..{} -> {:?}", start, end, style);

        for index in first..=last {
            let para = &mut self.paragraphs[index];
            let from = if index == first { a } else { 0 };
            let to = if index == last { b } else { para.len() };
            if from < to {
                para.restyle(from, to, style);
            }
        }

        self.version += 1;
        Ok(())
    }

    /// Replace a paragraph's style
    pub fn set_paragraph_style(&mut self, index: usize, style: &str) -> Result<()> {
        let count = self.paragraphs.len();
        let para = self
            .paragraphs
            .get_mut(index)
            .ok_or(Error::ParagraphOutOfRange { index, count })?;
        para.set_style(style);
        self.version += 1;
        Ok(())
    }

    /// Styled copy of `[start, end)`
    pub fn extract(&self, start: usize, end: usize) -> Result<Fragment> {
        self.check_range(start, end)?;
        let (first, a) = self.locate(start)?;
        let (last, b) = self.locate(end)?;

        let paragraphs = (first..=last)
            .map(|index| {
                let para = &self.paragraphs[index];
                let from = if index == first { a } else { 0 };
                let to = if index == last { b } else { para.len() };
                Paragraph::from_segments(para.style(), para.copy_range(from, to))
            })
            .collect();
        Ok(Fragment::new(paragraphs))
    }

    /// Apply an edit operation.
    ///
    /// Transactions are all-or-nothing: if any step fails the document is
    /// restored to its state before the transaction.
    pub fn apply_edit(&mut self, op: EditOp) -> Result<EditResult> {
        self.apply_with_reverse(op).map(|(result, _)| result)
    }

    /// Apply an edit operation and return the operation that undoes it
    pub fn apply_with_reverse(&mut self, op: EditOp) -> Result<(EditResult, EditOp)> {
        if let EditOp::Transaction { ops } = op {
            let snapshot = self.clone();
            let mut result = EditResult {
                version: self.version,
                caret: 0,
                ..Default::default()
            };
            let mut reverse_ops = Vec::with_capacity(ops.len());
            for sub in ops {
                match self.apply_with_reverse(sub) {
                    Ok((sub_result, reverse)) => {
                        result.absorb(sub_result);
                        reverse_ops.push(reverse);
                    }
                    Err(err) => {
                        *self = snapshot;
                        return Err(err);
                    }
                }
            }
            reverse_ops.reverse();
            return Ok((result, EditOp::Transaction { ops: reverse_ops }));
        }

        let reverse = self.compute_reverse(&op)?;
        let result = self.apply_single(op)?;
        Ok((result, reverse))
    }

    fn apply_single(&mut self, op: EditOp) -> Result<EditResult> {
        let count_before = self.paragraphs.len();
        let caret = op.caret_after();
        let (start, _) = op.affected_range();

        let first = match &op {
            EditOp::SetParagraphStyle { index, .. } => *index,
            _ => self.paragraph_at_offset(start)?,
        };

        match op {
            EditOp::InsertText {
                offset,
                text,
                style,
            } => self.insert_text(offset, &text, &style)?,
            EditOp::InsertObject { offset, object } => self.insert_object(offset, object)?,
            EditOp::InsertFragment { offset, fragment } => self.insert_fragment(offset, fragment)?,
            EditOp::Delete { start, end } => self.delete_range(start, end)?,
            EditOp::SetStyle { start, end, style } => self.set_style(start, end, &style)?,
            EditOp::SetParagraphStyle { index, style } => self.set_paragraph_style(index, &style)?,
            EditOp::Transaction { ops } => {
                return self.apply_edit(EditOp::Transaction { ops });
            }
        }

        let count_after = self.paragraphs.len();
        let created = count_after.saturating_sub(count_before);
        let removed = count_before.saturating_sub(count_after);
        let affected: SmallVec<[usize; 4]> = (first..=first + created)
            .filter(|&i| i < count_after)
            .collect();

        Ok(EditResult {
            version: self.version,
            affected_paragraphs: affected,
            created_paragraphs: created,
            removed_paragraphs: removed,
            caret: caret.min(self.len()),
        })
    }

    /// Compute the operation that reverts `op` on the current state
    pub fn compute_reverse(&self, op: &EditOp) -> Result<EditOp> {
        let reverse = match op {
            EditOp::InsertText { offset, text, .. } => {
                self.locate(*offset)?;
                EditOp::Delete {
                    start: *offset,
                    end: offset + text.chars().count(),
                }
            }
            EditOp::InsertObject { offset, .. } => {
                self.locate(*offset)?;
                EditOp::Delete {
                    start: *offset,
                    end: offset + 1,
                }
            }
            EditOp::InsertFragment { offset, fragment } => {
                self.locate(*offset)?;
                EditOp::Delete {
                    start: *offset,
                    end: offset + fragment.len(),
                }
            }
            EditOp::Delete { start, end } => EditOp::InsertFragment {
                offset: *start,
                fragment: self.extract(*start, *end)?,
            },
            EditOp::SetStyle { start, end, .. } => EditOp::Transaction {
                ops: vec![
                    EditOp::Delete {
                        start: *start,
                        end: *end,
                    },
                    EditOp::InsertFragment {
                        offset: *start,
                        fragment: self.extract(*start, *end)?,
                    },
                ],
            },
            EditOp::SetParagraphStyle { index, .. } => {
                let count = self.paragraphs.len();
                let para = self
                    .paragraphs
                    .get(*index)
                    .ok_or(Error::ParagraphOutOfRange {
                        index: *index,
                        count,
                    })?;
                EditOp::SetParagraphStyle {
                    index: *index,
                    style: para.style().to_string(),
                }
            }
            EditOp::Transaction { .. } => {
                let mut scratch = self.clone();
                return scratch.apply_with_reverse(op.clone()).map(|(_, reverse)| reverse);
            }
        };
        Ok(reverse)
    }

    /// Translate a flat offset to (paragraph index, intra-paragraph offset)
    fn locate(&self, offset: usize) -> Result<(usize, usize)> {
        let mut start = 0;
        for (index, para) in self.paragraphs.iter().enumerate() {
            let len = para.len();
            if offset <= start + len {
                return Ok((index, offset - start));
            }
            start += len + 1;
        }
        Err(Error::OutOfRange {
            offset,
            len: self.len(),
        })
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        let len = self.len();
        if start > end || end > len {
            return Err(Error::InvalidRange { start, end, len });
        }
        Ok(())
    }
}
