//! Paragraphs: a style string plus an ordered run of segments

use super::segment::Segment;
use serde::{Deserialize, Serialize};

/// A paragraph of mixed text and object segments.
///
/// Segments are kept normalized: no empty text runs and no two adjacent
/// text runs with the same style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ParagraphData")]
pub struct Paragraph {
    /// Opaque paragraph formatting (alignment, spacing)
    style: String,
    segments: Vec<Segment>,
}

/// Serialized form; normalized when converted into a [`Paragraph`]
#[derive(Deserialize)]
struct ParagraphData {
    style: String,
    segments: Vec<Segment>,
}

impl From<ParagraphData> for Paragraph {
    fn from(data: ParagraphData) -> Self {
        Paragraph::from_segments(data.style, data.segments)
    }
}

impl Paragraph {
    /// Create an empty paragraph with no style
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            segments: Vec::new(),
        }
    }

    /// Build a paragraph from arbitrary segments, normalizing them
    pub fn from_segments(style: impl Into<String>, segments: Vec<Segment>) -> Self {
        let mut para = Self {
            style: style.into(),
            segments,
        };
        para.normalize();
        para
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Length in the flat offset space, excluding the separator
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flattened text, objects as U+FFFC
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    pub fn push_text(&self, out: &mut String) {
        for segment in &self.segments {
            segment.push_text(out);
        }
    }

    /// Segment holding the unit at `offset`, if any
    pub fn segment_at(&self, offset: usize) -> Option<&Segment> {
        let mut pos = 0;
        for segment in &self.segments {
            let len = segment.len();
            if offset < pos + len {
                return Some(segment);
            }
            pos += len;
        }
        None
    }

    /// Number of object segments
    pub fn object_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_object()).count()
    }

    /// Ensure a segment boundary at `at` and return the index of the first
    /// segment after it. `at` must not exceed `len()`.
    fn boundary(&mut self, at: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.segments.len() {
            if pos == at {
                return i;
            }
            let len = self.segments[i].len();
            if at < pos + len {
                if let Some(tail) = self.segments[i].split_off(at - pos) {
                    self.segments.insert(i + 1, tail);
                }
                return i + 1;
            }
            pos += len;
        }
        self.segments.len()
    }

    /// Insert segments at an intra-paragraph offset
    pub(crate) fn insert_segments(&mut self, at: usize, segments: Vec<Segment>) {
        let index = self.boundary(at);
        self.segments.splice(index..index, segments);
        self.normalize();
    }

    /// Remove `[start, end)` and return the removed segments
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) -> Vec<Segment> {
        let s = self.boundary(start);
        let e = self.boundary(end);
        let removed: Vec<Segment> = self.segments.drain(s..e).collect();
        self.normalize();
        removed
    }

    /// Copy of the segments covering `[start, end)`
    pub(crate) fn copy_range(&self, start: usize, end: usize) -> Vec<Segment> {
        let mut scratch = self.clone();
        scratch.remove_range(start, end)
    }

    /// Overwrite the style of every unit in `[start, end)`
    pub(crate) fn restyle(&mut self, start: usize, end: usize, style: &str) {
        let s = self.boundary(start);
        let e = self.boundary(end);
        for segment in &mut self.segments[s..e] {
            segment.set_style(style);
        }
        self.normalize();
    }

    /// Split at `at`; this paragraph keeps the head, the tail is returned
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<Segment> {
        let index = self.boundary(at);
        let tail = self.segments.split_off(index);
        self.normalize();
        tail
    }

    /// Append segments at the end
    pub(crate) fn append(&mut self, segments: Vec<Segment>) {
        self.segments.extend(segments);
        self.normalize();
    }

    pub(crate) fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    // Drop empty runs and coalesce equal-style neighbours.
    fn normalize(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            if segment.is_text() && segment.is_empty() {
                continue;
            }
            if let Some(last) = merged.last_mut() {
                if last.try_merge(&segment) {
                    continue;
                }
            }
            merged.push(segment);
        }
        self.segments = merged;
    }
}
