//! Segments: styled text runs and atomic embedded objects

use serde::{Deserialize, Serialize};

/// Placeholder emitted for an embedded object when content is flattened
pub const OBJECT_REPLACEMENT_CHAR: char = '\u{FFFC}';

/// Kind of embedded object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Image,
    Table,
}

/// An embedded object before it is placed in a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedObject {
    pub kind: ObjectKind,
    /// Opaque payload (image source, table descriptor)
    pub payload: String,
    pub style: String,
}

impl EmbeddedObject {
    pub fn image(source: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::Image,
            payload: source.into(),
            style: String::new(),
        }
    }

    pub fn table(rows: usize, cols: usize) -> Self {
        Self {
            kind: ObjectKind::Table,
            payload: format!("{}x{}", rows, cols),
            style: String::new(),
        }
    }
}

/// One unit of paragraph content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// A run of characters sharing one style string
    Text { content: String, style: String },
    /// An embedded object occupying exactly one offset
    Object {
        kind: ObjectKind,
        payload: String,
        style: String,
    },
}

impl From<EmbeddedObject> for Segment {
    fn from(object: EmbeddedObject) -> Self {
        Segment::Object {
            kind: object.kind,
            payload: object.payload,
            style: object.style,
        }
    }
}

impl Segment {
    pub fn text(content: impl Into<String>, style: impl Into<String>) -> Self {
        Segment::Text {
            content: content.into(),
            style: style.into(),
        }
    }

    /// Length in the flat offset space
    pub fn len(&self) -> usize {
        match self {
            Segment::Text { content, .. } => content.chars().count(),
            Segment::Object { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Segment::Text { .. })
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Segment::Object { .. })
    }

    pub fn style(&self) -> &str {
        match self {
            Segment::Text { style, .. } | Segment::Object { style, .. } => style,
        }
    }

    pub fn set_style(&mut self, new_style: &str) {
        match self {
            Segment::Text { style, .. } | Segment::Object { style, .. } => {
                if style != new_style {
                    *style = new_style.to_string();
                }
            }
        }
    }

    /// Append the flattened form of this segment
    pub fn push_text(&self, out: &mut String) {
        match self {
            Segment::Text { content, .. } => out.push_str(content),
            Segment::Object { .. } => out.push(OBJECT_REPLACEMENT_CHAR),
        }
    }

    /// Split a text segment at a character index, returning the tail.
    ///
    /// Objects are atomic and are never split; `None` is returned for them
    /// and for indices that are not strictly inside the run.
    pub fn split_off(&mut self, at: usize) -> Option<Segment> {
        match self {
            Segment::Text { content, style } => {
                let byte = char_to_byte(content, at)?;
                if byte == 0 || byte == content.len() {
                    return None;
                }
                let tail = content.split_off(byte);
                Some(Segment::Text {
                    content: tail,
                    style: style.clone(),
                })
            }
            Segment::Object { .. } => None,
        }
    }

    /// Absorb `next` into this segment when both are text with equal style
    pub fn try_merge(&mut self, next: &Segment) -> bool {
        match (self, next) {
            (
                Segment::Text { content, style },
                Segment::Text {
                    content: next_content,
                    style: next_style,
                },
            ) if style == next_style => {
                content.push_str(next_content);
                true
            }
            _ => false,
        }
    }
}

/// Byte index of the `index`-th char, or `None` past the end
pub(crate) fn char_to_byte(text: &str, index: usize) -> Option<usize> {
    if index == 0 {
        return Some(0);
    }
    match text.char_indices().nth(index) {
        Some((byte, _)) => Some(byte),
        None if text.chars().count() == index => Some(text.len()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(Segment::text("héllo", "").len(), 5);
        assert_eq!(Segment::from(EmbeddedObject::image("a.png")).len(), 1);
        assert!(Segment::text("", "").is_empty());
    }

    #[test]
    fn test_split_text() {
        let mut seg = Segment::text("héllo", "bold");
        let tail = seg.split_off(2).unwrap();
        assert_eq!(seg, Segment::text("hé", "bold"));
        assert_eq!(tail, Segment::text("llo", "bold"));
    }

    #[test]
    fn test_split_at_edges_is_refused() {
        let mut seg = Segment::text("abc", "");
        assert!(seg.split_off(0).is_none());
        assert!(seg.split_off(3).is_none());
        assert!(seg.split_off(7).is_none());
        assert_eq!(seg, Segment::text("abc", ""));
    }

    #[test]
    fn test_objects_never_split_or_merge() {
        let mut obj = Segment::from(EmbeddedObject::table(2, 3));
        assert!(obj.split_off(0).is_none());
        let other = obj.clone();
        assert!(!obj.try_merge(&other));
    }

    #[test]
    fn test_merge_requires_equal_style() {
        let mut a = Segment::text("ab", "bold");
        assert!(!a.try_merge(&Segment::text("cd", "italic")));
        assert!(a.try_merge(&Segment::text("cd", "bold")));
        assert_eq!(a, Segment::text("abcd", "bold"));
    }

    #[test]
    fn test_push_text_uses_placeholder() {
        let mut out = String::new();
        Segment::text("x", "").push_text(&mut out);
        Segment::from(EmbeddedObject::image("i.png")).push_text(&mut out);
        assert_eq!(out, "x\u{FFFC}");
    }

    #[test]
    fn test_char_to_byte() {
        assert_eq!(char_to_byte("aé b", 0), Some(0));
        assert_eq!(char_to_byte("aé b", 2), Some(3));
        assert_eq!(char_to_byte("aé b", 4), Some(5));
        assert_eq!(char_to_byte("aé b", 5), None);
    }
}
