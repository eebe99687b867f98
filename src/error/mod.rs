//! Errors from reading documents and parsing tags.

mod document;
mod tag;

pub use document::DocumentError;
pub use tag::{BadTag, BadTagKind};
