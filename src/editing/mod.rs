//! Editing model: selection and reversible edit operations

mod cursor;
mod operation;

pub use cursor::Selection;
pub use operation::{EditOp, EditResult};
