//! Pagination for multi-page documents
//!
//! Paragraphs are placed greedily and never split across pages. Heights come
//! from an injected [`ParagraphMeasurer`], so the same document paginates
//! differently under different rendering environments.

use crate::document::{Document, Paragraph};
use crate::header_footer::HeaderFooterManager;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page size and margins, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Applied on all four sides
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 50.0,
        }
    }
}

impl PageGeometry {
    pub fn new(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin,
        }
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Width available to paragraph content
    pub fn content_width(&self) -> f32 {
        (self.page_width - 2.0 * self.margin).max(0.0)
    }

    /// Height available to paragraph content
    pub fn content_height(&self) -> f32 {
        (self.page_height - 2.0 * self.margin).max(0.0)
    }
}

/// One output page: its content range and resolved header/footer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    /// Page number (1-based)
    pub index: usize,
    /// Flat-offset range of the content placed on this page
    pub content: Range<usize>,
    /// Paragraph indices placed on this page
    pub paragraphs: Range<usize>,
    pub header: String,
    pub footer: String,
}

/// Measures the rendered height of a paragraph at a given content width
pub trait ParagraphMeasurer {
    fn paragraph_height(&self, paragraph: &Paragraph, content_width: f32) -> f32;
}

impl<F> ParagraphMeasurer for F
where
    F: Fn(&Paragraph, f32) -> f32,
{
    fn paragraph_height(&self, paragraph: &Paragraph, content_width: f32) -> f32 {
        self(paragraph, content_width)
    }
}

/// Lazy page sequence over a borrowed document.
///
/// Restart by creating a new paginator; pages are never updated in place.
pub struct Paginator<'a, M: ?Sized> {
    document: &'a Document,
    geometry: PageGeometry,
    headers: &'a HeaderFooterManager,
    measurer: &'a M,
    /// Next paragraph to place
    next_paragraph: usize,
    /// Flat offset where `next_paragraph` starts
    next_offset: usize,
    page_number: usize,
}

impl<'a, M: ParagraphMeasurer + ?Sized> Paginator<'a, M> {
    pub fn new(
        document: &'a Document,
        geometry: PageGeometry,
        headers: &'a HeaderFooterManager,
        measurer: &'a M,
    ) -> Self {
        Self {
            document,
            geometry,
            headers,
            measurer,
            next_paragraph: 0,
            next_offset: 0,
            page_number: 0,
        }
    }

    fn descriptor(&self, paragraphs: Range<usize>, content: Range<usize>) -> PageDescriptor {
        let page = self.page_number as i64;
        PageDescriptor {
            index: self.page_number,
            content,
            paragraphs,
            header: self.headers.complete_header_for_page(page),
            footer: self.headers.complete_footer_for_page(page),
        }
    }
}

impl<'a, M: ParagraphMeasurer + ?Sized> Iterator for Paginator<'a, M> {
    type Item = PageDescriptor;

    fn next(&mut self) -> Option<PageDescriptor> {
        let paragraphs = self.document.paragraphs();
        let total = paragraphs.len();
        // A document always has at least one page
        if self.next_paragraph >= total && self.page_number > 0 {
            return None;
        }

        let available = self.geometry.content_height();
        let width = self.geometry.content_width();
        let first = self.next_paragraph;
        let start = self.next_offset;
        let mut used = 0.0;
        let mut end = start;

        while self.next_paragraph < total {
            let para = &paragraphs[self.next_paragraph];
            let height = self.measurer.paragraph_height(para, width);
            if self.next_paragraph > first && used + height > available {
                break;
            }
            used += height;
            end = self.next_offset + para.len();
            // Skip the paragraph separator
            self.next_offset = end + 1;
            self.next_paragraph += 1;
        }

        self.page_number += 1;
        if self.next_paragraph < total {
            log::debug!(
                "page {} ends before paragraph {} ({:.1}/{:.1}pt used)",
                self.page_number,
                self.next_paragraph,
                used,
                available
            );
        }
        Some(self.descriptor(first..self.next_paragraph, start..end))
    }
}

/// Paginate a whole document
pub fn paginate<M: ParagraphMeasurer + ?Sized>(
    document: &Document,
    geometry: PageGeometry,
    headers: &HeaderFooterManager,
    measurer: &M,
) -> Vec<PageDescriptor> {
    Paginator::new(document, geometry, headers, measurer).collect()
}
