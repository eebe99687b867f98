//! The three on-disk document shapes and their adapters.
//!
//! All converters are pure: they read and write plain data, never files
//! or media. Coordinate normalization is threaded through every call as
//! an explicit [`ImportContext`] instead of shared mutable state, so two
//! imports can run without interference and a single import is trivially
//! retryable.

mod context;
pub(crate) mod interchange;
pub(crate) mod story_data;
pub(crate) mod visual;

pub use context::ImportContext;
pub use interchange::{
    EntityEnvelope, InterchangeAssociation, InterchangeCarryover, InterchangeDocument,
    InterchangeEntity,
};
pub use story_data::StoryDataDocument;
pub use visual::{VisualDocument, VisualEdge, VisualNode};

/// Check that every required top-level field of a document is present
/// and an array. Returns the offending field names.
pub(crate) fn missing_array_fields(
    document: &serde_json::Value,
    fields: &[&str],
) -> Vec<String> {
    fields
        .iter()
        .filter(|field| !document.get(**field).map_or(false, |value| value.is_array()))
        .map(|field| field.to_string())
        .collect()
}
