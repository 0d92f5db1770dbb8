//! Font metrics for layout

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Metrics needed for text layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Line height in points
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 12pt body text at 1.2 line spacing, average glyph 6pt
        Self::monospace(14.4, 6.0)
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character the same width
    pub fn monospace(line_height: f32, width: f32) -> Self {
        Self::new(line_height, vec![width; 128], width)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Horizontal advance of a character; tabs are four default widths
    pub fn advance(&self, c: char) -> f32 {
        match c {
            '\t' => self.default_width * 4.0,
            c if c.is_control() => 0.0,
            c => self.width(c),
        }
    }

    /// Width of a run of text
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|c| self.advance(c)).sum()
    }
}

/// Font metrics keyed by segment style string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontLibrary {
    fallback: FontMetrics,
    styles: FxHashMap<String, FontMetrics>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library whose fallback is `metrics`
    pub fn with_fallback(metrics: FontMetrics) -> Self {
        Self {
            fallback: metrics,
            styles: FxHashMap::default(),
        }
    }

    /// Register metrics for an exact style string
    pub fn set(&mut self, style: impl Into<String>, metrics: FontMetrics) {
        self.styles.insert(style.into(), metrics);
    }

    /// Metrics for a style, falling back to the default font
    pub fn get(&self, style: &str) -> &FontMetrics {
        self.styles.get(style).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &FontMetrics {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
