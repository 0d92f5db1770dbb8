//! Plain-text and paragraph-list import/export
//!
//! Plain text carries no styles. Embedded objects are written as U+FFFC, so a
//! round trip through plain text loses them; [`write_plain_text`] reports how
//! many were flattened.

use crate::document::{
    Document, Fragment, Paragraph, Segment, OBJECT_REPLACEMENT_CHAR, PARAGRAPH_SEPARATOR,
};
use crate::error::Result;
use std::io::{Read, Write};

/// What an export wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Characters written, placeholders and paragraph breaks included
    pub chars: usize,
    /// Embedded objects replaced by U+FFFC
    pub objects_flattened: usize,
}

impl ExportSummary {
    pub fn is_lossy(&self) -> bool {
        self.objects_flattened > 0
    }
}

impl Document {
    /// Build an unstyled document; `'\n'` (or `"\r\n"`) separates paragraphs
    pub fn from_plain_text(text: &str) -> Self {
        Self::from_paragraphs(text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)))
    }

    /// Build an unstyled document from extracted paragraph strings.
    ///
    /// An empty iterator gives an empty document.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = Vec::new();
        for para in paragraphs {
            // Embedded newlines split further paragraphs
            for line in para.as_ref().split(PARAGRAPH_SEPARATOR) {
                lines.push(Paragraph::from_segments("", vec![Segment::text(line, "")]));
            }
        }
        Document::from(Fragment::new(lines))
    }
}

/// Read a whole plain-text stream into a new document
pub fn read_plain_text<R: Read>(mut reader: R) -> Result<Document> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let doc = Document::from_plain_text(&text);
    log::debug!(
        "imported {} paragraph(s), {} chars",
        doc.paragraph_count(),
        doc.len()
    );
    Ok(doc)
}

/// Write the flattened document text
pub fn write_plain_text<W: Write>(document: &Document, mut writer: W) -> Result<ExportSummary> {
    let text = document.text();
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    let summary = ExportSummary {
        chars: document.len(),
        objects_flattened: document.object_count(),
    };
    if summary.is_lossy() {
        log::warn!(
            "plain-text export replaced {} embedded object(s) with {:?}",
            summary.objects_flattened,
            OBJECT_REPLACEMENT_CHAR
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EmbeddedObject;

    #[test]
    fn test_from_plain_text() {
        let doc = Document::from_plain_text("one\r\ntwo\n\nfour");
        assert_eq!(doc.paragraph_count(), 4);
        assert_eq!(doc.text(), "one\ntwo\n\nfour");
        assert!(doc.paragraphs().iter().all(|p| p.style().is_empty()));
    }

    #[test]
    fn test_from_paragraphs() {
        let doc = Document::from_paragraphs(["Title", "Body text"]);
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.paragraph(1).unwrap().text(), "Body text");

        let empty = Document::from_paragraphs(Vec::<String>::new());
        assert_eq!(empty, Document::new());
    }

    #[test]
    fn test_from_paragraphs_splits_embedded_newlines() {
        let doc = Document::from_paragraphs(vec!["a\nb".to_string(), String::new()]);
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.text(), "a\nb\n");
        assert_eq!(doc.version(), 0);
        assert!(doc.paragraph(2).unwrap().is_empty());
    }

    #[test]
    fn test_read_plain_text() {
        let doc = read_plain_text("a\nb".as_bytes()).unwrap();
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_read_rejects_invalid_utf8() {
        let bytes: &[u8] = &[0x66, 0xff, 0x6f];
        assert!(matches!(
            read_plain_text(bytes),
            Err(crate::error::Error::Io(_))
        ));
    }

    #[test]
    fn test_write_plain_text() {
        let doc = Document::from_plain_text("hello\nworld");
        let mut out = Vec::new();
        let summary = write_plain_text(&doc, &mut out).unwrap();
        assert_eq!(out, b"hello\nworld");
        assert_eq!(summary.chars, 11);
        assert!(!summary.is_lossy());
    }

    #[test]
    fn test_write_flattens_objects() {
        let mut doc = Document::from_plain_text("ab");
        doc.insert_object(1, EmbeddedObject::image("pic.png")).unwrap();
        let mut out = Vec::new();
        let summary = write_plain_text(&doc, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\u{FFFC}b");
        assert_eq!(summary.objects_flattened, 1);
        assert_eq!(summary.chars, 3);

        let reread = read_plain_text(doc.text().as_bytes()).unwrap();
        assert_eq!(reread.object_count(), 0);
        assert_eq!(reread.len(), doc.len());
    }
}
