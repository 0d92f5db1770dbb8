//! Page layout: paragraph measurement and pagination

pub mod font;
mod line_break;
mod pagination;

pub use font::{FontLibrary, FontMetrics};
pub use line_break::{LineLayout, LineMeasurer};
pub use pagination::{paginate, PageDescriptor, PageGeometry, Paginator, ParagraphMeasurer};
