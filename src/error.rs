//! Error types for the document core

use crate::header_footer::PageNumberFormat;
use std::io;
use thiserror::Error;

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised synchronously by the offending call.
///
/// Every mutating operation validates its arguments before touching the
/// document, so an `Err` always means nothing was changed.
#[derive(Error, Debug)]
pub enum Error {
    /// A flat offset lies beyond the end of the document
    #[error("offset {offset} is out of range (document length {len})")]
    OutOfRange { offset: usize, len: usize },

    /// A paragraph index does not exist
    #[error("paragraph {index} is out of range (document has {count} paragraphs)")]
    ParagraphOutOfRange { index: usize, count: usize },

    /// `start > end`, or `end` beyond the document
    #[error("invalid range {start}..{end} (document length {len})")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// The page number has no representation in the requested numeral system
    #[error("page number {number} cannot be written as {format} numerals")]
    UnsupportedNumeral { number: i64, format: PageNumberFormat },

    /// I/O error while importing or exporting plain text
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
