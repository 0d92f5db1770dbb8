//! Literal, case-sensitive search and replace over the flattened text

use super::segment::char_to_byte;
use super::{Document, Fragment, Paragraph, Segment, PARAGRAPH_SEPARATOR};
use crate::editing::EditOp;
use crate::error::{Error, Result};
use std::iter::Peekable;

impl Document {
    /// Find `needle` at or after `from`, optionally wrapping to the start.
    ///
    /// On wrap, only matches starting before `from` are accepted. An empty
    /// needle never matches.
    pub fn find(&self, needle: &str, from: usize, wrap: bool) -> Result<Option<usize>> {
        let len = self.len();
        if from > len {
            return Err(Error::OutOfRange { offset: from, len });
        }
        if needle.is_empty() {
            return Ok(None);
        }

        let text = self.text();
        let from_byte = char_to_byte(&text, from).unwrap_or(text.len());

        if let Some(byte) = text[from_byte..].find(needle) {
            let offset = from + text[from_byte..from_byte + byte].chars().count();
            return Ok(Some(offset));
        }

        if wrap {
            if let Some(byte) = text.find(needle) {
                let offset = text[..byte].chars().count();
                if offset < from {
                    return Ok(Some(offset));
                }
            }
        }

        Ok(None)
    }

    /// Offsets of every non-overlapping match, left to right
    pub fn find_all(&self, needle: &str) -> Vec<usize> {
        if needle.is_empty() {
            return Vec::new();
        }
        let text = self.text();
        let mut offsets = Vec::new();
        let mut last_byte = 0;
        let mut last_offset = 0;
        for (byte, _) in text.match_indices(needle) {
            last_offset += text[last_byte..byte].chars().count();
            last_byte = byte;
            offsets.push(last_offset);
        }
        offsets
    }

    /// Plan a replace-all as one transaction.
    ///
    /// Returns the number of matches and the operation, or `None` when
    /// nothing matches. The paragraphs holding matches are rebuilt in a
    /// single pass, so the operation is one `Delete` of that span followed
    /// by one `InsertFragment` of the rewritten content. Each replacement
    /// takes the style of the unit where its match started.
    pub fn replace_all_op(
        &self,
        needle: &str,
        replacement: &str,
    ) -> Result<Option<(usize, EditOp)>> {
        let matches = self.find_all(needle);
        let (Some(&first), Some(&last)) = (matches.first(), matches.last()) else {
            return Ok(None);
        };
        let needle_len = needle.chars().count();

        let first_para = self.paragraph_at_offset(first)?;
        let last_para = self.paragraph_at_offset(last + needle_len)?;
        let start = self.paragraph_range(first_para)?.start;
        let end = self.paragraph_range(last_para)?.end;

        let count = matches.len();
        let rewrite = Rewrite {
            replacement,
            needle_len,
            matches: matches.into_iter().map(|m| m - start).peekable(),
            pos: 0,
            skip_until: 0,
            prev_style: None,
            done: Vec::with_capacity(last_para - first_para + 1),
            style: String::new(),
            segments: Vec::new(),
        };
        let fragment = rewrite.run(&self.paragraphs()[first_para..=last_para]);

        let op = EditOp::transaction(vec![
            EditOp::delete(start, end),
            EditOp::InsertFragment {
                offset: start,
                fragment,
            },
        ]);
        Ok(Some((count, op)))
    }

    /// Replace every non-overlapping occurrence in one left-to-right pass
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize> {
        match self.replace_all_op(needle, replacement)? {
            Some((count, op)) => {
                self.apply_edit(op)?;
                log::debug!("replaced {} occurrence(s) of {:?}", count, needle);
                Ok(count)
            }
            None => Ok(0),
        }
    }
}

/// Rebuilds a run of whole paragraphs with every match replaced.
///
/// Walks the flat units once. Offsets in `matches` are relative to the
/// start of the first paragraph and must be sorted and non-overlapping.
struct Rewrite<'a, I: Iterator<Item = usize>> {
    replacement: &'a str,
    needle_len: usize,
    matches: Peekable<I>,
    pos: usize,
    /// Units before this offset belong to a match and are dropped
    skip_until: usize,
    /// Style of the previous source unit; `None` after a separator
    prev_style: Option<&'a str>,
    done: Vec<Paragraph>,
    style: String,
    segments: Vec<Segment>,
}

impl<'a, I: Iterator<Item = usize>> Rewrite<'a, I> {
    fn run(mut self, paragraphs: &'a [Paragraph]) -> Fragment {
        for (i, para) in paragraphs.iter().enumerate() {
            if i == 0 {
                self.style = para.style().to_string();
            } else {
                // A separator swallowed by a match joins the paragraphs
                // under the earlier style.
                if self.keep(None) {
                    self.break_paragraph(para.style().to_string());
                }
            }
            for segment in para.segments() {
                match segment {
                    Segment::Text { content, style } => {
                        for ch in content.chars() {
                            if self.keep(Some(style.as_str())) {
                                self.push_char(ch, style);
                            }
                        }
                    }
                    Segment::Object { style, .. } => {
                        if self.keep(Some(style.as_str())) {
                            self.segments.push(segment.clone());
                        }
                    }
                }
            }
        }
        let style = std::mem::take(&mut self.style);
        self.break_paragraph(style);
        Fragment::new(self.done)
    }

    /// Advance over one source unit; false when a match swallows it.
    fn keep(&mut self, unit_style: Option<&'a str>) -> bool {
        if self.matches.peek() == Some(&self.pos) {
            self.matches.next();
            // A match starting on a separator borrows the style before it.
            let style = unit_style.or(self.prev_style).unwrap_or_default();
            self.push_replacement(style);
            self.skip_until = self.pos + self.needle_len;
        }
        let kept = self.pos >= self.skip_until;
        self.prev_style = unit_style;
        self.pos += 1;
        kept
    }

    fn push_replacement(&mut self, style: &str) {
        let replacement = self.replacement;
        for (i, line) in replacement.split(PARAGRAPH_SEPARATOR).enumerate() {
            if i > 0 {
                let style = self.style.clone();
                self.break_paragraph(style);
            }
            for ch in line.chars() {
                self.push_char(ch, style);
            }
        }
    }

    fn push_char(&mut self, ch: char, style: &str) {
        if let Some(Segment::Text {
            content,
            style: last,
        }) = self.segments.last_mut()
        {
            if last.as_str() == style {
                content.push(ch);
                return;
            }
        }
        self.segments.push(Segment::text(ch.to_string(), style));
    }

    // Close the current paragraph and open one styled `next_style`.
    fn break_paragraph(&mut self, next_style: String) {
        let style = std::mem::replace(&mut self.style, next_style);
        let segments = std::mem::take(&mut self.segments);
        self.done.push(Paragraph::from_segments(style, segments));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EmbeddedObject;

    fn doc(text: &str) -> Document {
        let mut doc = Document::new();
        doc.insert_text(0, text, "").unwrap();
        doc
    }

    #[test]
    fn test_find_forward() {
        assert_eq!(doc("xx foo yy").find("foo", 0, false).unwrap(), Some(3));
        assert_eq!(doc("xx bar yy").find("foo", 0, false).unwrap(), None);
    }

    #[test]
    fn test_find_counts_chars_not_bytes() {
        assert_eq!(doc("ééé foo").find("foo", 1, false).unwrap(), Some(4));
    }

    #[test]
    fn test_find_wraps() {
        let doc = doc("foo bar foo");
        assert_eq!(doc.find("foo", 9, false).unwrap(), None);
        assert_eq!(doc.find("foo", 9, true).unwrap(), Some(0));
        assert_eq!(doc.find("foo", 1, true).unwrap(), Some(8));
    }

    #[test]
    fn test_find_is_case_sensitive() {
        assert_eq!(doc("Foo").find("foo", 0, true).unwrap(), None);
    }

    #[test]
    fn test_find_edge_cases() {
        let doc = doc("abc");
        assert_eq!(doc.find("", 0, true).unwrap(), None);
        assert!(matches!(doc.find("a", 4, false), Err(Error::OutOfRange { offset: 4, len: 3 })));
        assert_eq!(doc.find("a", 3, false).unwrap(), None);
    }

    #[test]
    fn test_find_across_paragraphs() {
        let doc = doc("end\nstart");
        assert_eq!(doc.find("d\ns", 0, false).unwrap(), Some(2));
    }

    #[test]
    fn test_replace_all_banana() {
        let mut doc = doc("banana");
        assert_eq!(doc.replace_all("a", "bb").unwrap(), 3);
        assert_eq!(doc.text(), "bbbnbbnbb");
    }

    #[test]
    fn test_replace_all_does_not_revisit_replacements() {
        let mut doc = doc("aaa");
        assert_eq!(doc.replace_all("a", "aa").unwrap(), 3);
        assert_eq!(doc.text(), "aaaaaa");
    }

    #[test]
    fn test_replace_all_non_overlapping() {
        let mut doc = doc("aaaa");
        assert_eq!(doc.replace_all("aa", "b").unwrap(), 2);
        assert_eq!(doc.text(), "bb");
    }

    #[test]
    fn test_replace_all_with_empty_replacement() {
        let mut doc = doc("a-b-c");
        assert_eq!(doc.replace_all("-", "").unwrap(), 2);
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_replace_all_no_match() {
        let mut doc = doc("abc");
        let version = doc.version();
        assert_eq!(doc.replace_all("z", "y").unwrap(), 0);
        assert_eq!(doc.replace_all("", "y").unwrap(), 0);
        assert_eq!(doc.version(), version);
    }

    #[test]
    fn test_replace_keeps_match_style() {
        let mut doc = Document::new();
        doc.insert_text(0, "say ", "").unwrap();
        doc.insert_text(4, "hi", "bold").unwrap();
        doc.replace_all("hi", "hello").unwrap();
        assert_eq!(
            doc.paragraph(0).unwrap().segments(),
            &[Segment::text("say ", ""), Segment::text("hello", "bold")]
        );
    }

    #[test]
    fn test_replace_across_paragraph_boundary() {
        let mut doc = doc("end\nstart");
        doc.set_paragraph_style(0, "first").unwrap();
        doc.set_paragraph_style(1, "second").unwrap();
        assert_eq!(doc.replace_all("d\ns", "X").unwrap(), 1);
        assert_eq!(doc.text(), "enXtart");
        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(doc.paragraph(0).unwrap().style(), "first");
    }

    #[test]
    fn test_replacement_with_line_break_splits_paragraph() {
        let mut doc = doc("a-b\nc");
        doc.set_paragraph_style(0, "centered").unwrap();
        assert_eq!(doc.replace_all("-", "\n").unwrap(), 1);
        assert_eq!(doc.text(), "a\nb\nc");
        let styles: Vec<_> = doc.paragraphs().iter().map(Paragraph::style).collect();
        assert_eq!(styles, ["centered", "centered", ""]);
    }

    #[test]
    fn test_match_on_separator_takes_previous_style() {
        let mut doc = Document::new();
        doc.insert_text(0, "ab", "bold").unwrap();
        doc.insert_text(2, "\ncd", "").unwrap();
        doc.replace_all("\nc", "Z").unwrap();
        assert_eq!(
            doc.paragraph(0).unwrap().segments(),
            &[Segment::text("abZ", "bold"), Segment::text("d", "")]
        );
    }

    #[test]
    fn test_replace_leaves_other_paragraphs_alone() {
        let mut doc = doc("keep\nfoo here\nkeep");
        doc.set_style(0, 4, "a").unwrap();
        doc.set_style(14, 18, "z").unwrap();
        doc.insert_object(7, EmbeddedObject::image("p.png")).unwrap();
        let before = doc.clone();

        let (count, op) = doc.replace_all_op("o", "0").unwrap().unwrap();
        assert_eq!(count, 2);
        let EditOp::Transaction { ops } = &op else {
            panic!("expected a transaction");
        };
        assert_eq!(ops.len(), 2);
        assert_eq!(op.affected_range(), (5, 14));

        let (_, reverse) = doc.apply_with_reverse(op).unwrap();
        assert_eq!(doc.text(), "keep\nf0\u{FFFC}0 here\nkeep");
        assert_eq!(doc.paragraph(0).unwrap(), before.paragraph(0).unwrap());
        assert_eq!(doc.paragraph(2).unwrap(), before.paragraph(2).unwrap());
        assert_eq!(doc.object_count(), 1);

        doc.apply_edit(reverse).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_replace_all_many_matches() {
        let n = 20_000;
        let mut doc = Document::from_plain_text(&"a \n".repeat(n));
        let (count, op) = doc.replace_all_op("a", "bb").unwrap().unwrap();
        assert_eq!(count, n);
        assert!(matches!(&op, EditOp::Transaction { ops } if ops.len() == 2));

        let before = doc.clone();
        let (_, reverse) = doc.apply_with_reverse(op).unwrap();
        assert_eq!(doc.text(), "bb \n".repeat(n));
        assert_eq!(doc.paragraph_count(), n + 1);
        doc.apply_edit(reverse).unwrap();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_find_all_offsets() {
        assert_eq!(doc("ab ab\nab").find_all("ab"), vec![0, 3, 6]);
    }
}
