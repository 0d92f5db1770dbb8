//! Line breaking algorithm

use crate::document::{ObjectKind, Paragraph, Segment, OBJECT_REPLACEMENT_CHAR};
use crate::layout::font::{FontLibrary, FontMetrics};
use crate::layout::pagination::ParagraphMeasurer;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// One laid-out line of a paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Unit range within the paragraph
    pub range: Range<usize>,
    /// Width without trailing whitespace
    pub width: f32,
    /// Tallest unit on the line
    pub height: f32,
}

// Measured width and height of one offset unit.
#[derive(Debug, Clone, Copy)]
struct Unit {
    width: f32,
    height: f32,
    whitespace: bool,
}

/// Default paragraph measurer: greedy line breaking at Unicode line break
/// opportunities with per-style font metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineMeasurer {
    fonts: FontLibrary,
    /// Box size for images
    image_width: f32,
    image_height: f32,
    /// Height of one table row; tables span the full content width
    table_row_height: f32,
    /// Extra space after every paragraph
    paragraph_spacing: f32,
}

impl Default for LineMeasurer {
    fn default() -> Self {
        Self {
            fonts: FontLibrary::default(),
            image_width: 200.0,
            image_height: 150.0,
            table_row_height: 20.0,
            paragraph_spacing: 0.0,
        }
    }
}

impl LineMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_image_size(mut self, width: f32, height: f32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_table_row_height(mut self, height: f32) -> Self {
        self.table_row_height = height;
        self
    }

    pub fn with_paragraph_spacing(mut self, spacing: f32) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Break a paragraph into lines no wider than `max_width`.
    ///
    /// An empty paragraph still has one line. A unit wider than the line is
    /// placed on a line of its own.
    pub fn layout_paragraph(&self, paragraph: &Paragraph, max_width: f32) -> Vec<LineLayout> {
        let (text, units) = self.measure_units(paragraph, max_width);
        let default_metrics = self.paragraph_metrics(paragraph);

        if units.is_empty() {
            return vec![LineLayout {
                range: 0..0,
                width: 0.0,
                height: default_metrics.line_height,
            }];
        }

        // Break opportunities as unit indices
        let mut char_index = 0;
        let mut byte_cursor = 0;
        let mut breaks = Vec::new();
        for (byte, opportunity) in linebreaks(&text) {
            char_index += text[byte_cursor..byte].chars().count();
            byte_cursor = byte;
            breaks.push((char_index, opportunity));
        }

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut prev = 0;

        for (brk, opportunity) in breaks {
            let word = &units[prev..brk];
            let full: f32 = word.iter().map(|u| u.width).sum();
            let visible = full - trailing_whitespace(word);

            if prev > line_start && line_width + visible > max_width {
                lines.push(self.line(&units, line_start..prev, default_metrics));
                line_start = prev;
                line_width = 0.0;
            }

            if prev == line_start && visible > max_width {
                // Emergency break inside an overlong word
                let mut x = 0.0;
                for (i, unit) in units.iter().enumerate().take(brk).skip(prev) {
                    if i > line_start && x + unit.width > max_width {
                        lines.push(self.line(&units, line_start..i, default_metrics));
                        line_start = i;
                        x = 0.0;
                    }
                    x += unit.width;
                }
                line_width = x;
            } else {
                line_width += full;
            }
            prev = brk;

            if opportunity == BreakOpportunity::Mandatory && brk < units.len() {
                lines.push(self.line(&units, line_start..brk, default_metrics));
                line_start = brk;
                line_width = 0.0;
            }
        }

        if line_start < units.len() || lines.is_empty() {
            lines.push(self.line(&units, line_start..units.len(), default_metrics));
        }
        lines
    }

    fn line(&self, units: &[Unit], range: Range<usize>, fallback: &FontMetrics) -> LineLayout {
        let slice = &units[range.clone()];
        let height = slice
            .iter()
            .map(|u| u.height)
            .fold(0.0_f32, f32::max);
        let full: f32 = slice.iter().map(|u| u.width).sum();
        LineLayout {
            width: full - trailing_whitespace(slice),
            height: if height > 0.0 {
                height
            } else {
                fallback.line_height
            },
            range,
        }
    }

    // Empty paragraphs and blank lines take the height of the paragraph style.
    fn paragraph_metrics(&self, paragraph: &Paragraph) -> &FontMetrics {
        self.fonts.get(paragraph.style())
    }

    fn measure_units(&self, paragraph: &Paragraph, max_width: f32) -> (String, Vec<Unit>) {
        let mut text = String::with_capacity(paragraph.len());
        let mut units = Vec::with_capacity(paragraph.len());

        for segment in paragraph.segments() {
            match segment {
                Segment::Text { content, style } => {
                    let metrics = self.fonts.get(style);
                    for c in content.chars() {
                        units.push(Unit {
                            width: metrics.advance(c),
                            height: metrics.line_height,
                            whitespace: c.is_whitespace(),
                        });
                    }
                    text.push_str(content);
                }
                Segment::Object { kind, payload, .. } => {
                    let (width, height) = match kind {
                        ObjectKind::Image => (self.image_width.min(max_width), self.image_height),
                        ObjectKind::Table => {
                            (max_width, table_rows(payload) as f32 * self.table_row_height)
                        }
                    };
                    units.push(Unit {
                        width,
                        height,
                        whitespace: false,
                    });
                    text.push(OBJECT_REPLACEMENT_CHAR);
                }
            }
        }
        (text, units)
    }
}

impl ParagraphMeasurer for LineMeasurer {
    fn paragraph_height(&self, paragraph: &Paragraph, content_width: f32) -> f32 {
        let lines = self.layout_paragraph(paragraph, content_width);
        lines.iter().map(|l| l.height).sum::<f32>() + self.paragraph_spacing
    }
}

fn trailing_whitespace(units: &[Unit]) -> f32 {
    units
        .iter()
        .rev()
        .take_while(|u| u.whitespace)
        .map(|u| u.width)
        .sum()
}

// Tables carry "ROWSxCOLS"; anything else counts as one row.
fn table_rows(payload: &str) -> usize {
    payload
        .split('x')
        .next()
        .and_then(|rows| rows.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EmbeddedObject;

    fn measurer(char_width: f32) -> LineMeasurer {
        LineMeasurer::new()
            .with_fonts(FontLibrary::with_fallback(FontMetrics::monospace(10.0, char_width)))
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::from_segments("", vec![Segment::text(text, "")])
    }

    #[test]
    fn test_empty_paragraph() {
        let lines = measurer(8.0).layout_paragraph(&Paragraph::new(), 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].range, 0..0);
        assert_eq!(lines[0].height, 10.0);
    }

    #[test]
    fn test_single_line() {
        let lines = measurer(8.0).layout_paragraph(&para("Hello"), 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].range, 0..5);
        assert_eq!(lines[0].width, 40.0);
    }

    #[test]
    fn test_line_wrap() {
        // With 8pt per char, 40pt width = 5 chars per line
        let lines = measurer(8.0).layout_paragraph(&para("Hello World"), 40.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].range, 0..6);
        assert_eq!(lines[0].width, 40.0);
        assert_eq!(lines[1].range, 6..11);
    }

    #[test]
    fn test_emergency_break() {
        let lines = measurer(10.0).layout_paragraph(&para("abcdefghij"), 35.0);
        let ranges: Vec<_> = lines.iter().map(|l| l.range.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..9, 9..10]);
    }

    #[test]
    fn test_tallest_style_sets_line_height() {
        let mut fonts = FontLibrary::with_fallback(FontMetrics::monospace(10.0, 5.0));
        fonts.set("big", FontMetrics::monospace(30.0, 5.0));
        let m = LineMeasurer::new().with_fonts(fonts);
        let p = Paragraph::from_segments(
            "",
            vec![Segment::text("small ", ""), Segment::text("big", "big")],
        );
        let lines = m.layout_paragraph(&p, 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].height, 30.0);
    }

    #[test]
    fn test_objects_have_boxes() {
        let m = measurer(5.0).with_table_row_height(12.0);
        let table = Paragraph::from_segments("", vec![EmbeddedObject::table(3, 2).into()]);
        assert_eq!(m.paragraph_height(&table, 400.0), 36.0);

        let image = Paragraph::from_segments("", vec![EmbeddedObject::image("a.png").into()]);
        assert_eq!(m.paragraph_height(&image, 400.0), 150.0);
    }

    #[test]
    fn test_paragraph_spacing() {
        let m = measurer(5.0).with_paragraph_spacing(4.0);
        assert_eq!(m.paragraph_height(&para("hi"), 100.0), 14.0);
    }

    #[test]
    fn test_table_rows() {
        assert_eq!(table_rows("4x2"), 4);
        assert_eq!(table_rows("junk"), 1);
        assert_eq!(table_rows("0x3"), 1);
    }
}
