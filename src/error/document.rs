//! Fatal, document-scoped errors.

use thiserror::Error;

/// Error from loading an on-disk document.
///
/// This is the only fatal error in the crate. It is raised before any graph
/// construction begins, so a failed import never touches previously loaded
/// state. Everything below document level is handled best-effort with
/// defaults instead.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A required top-level array is missing or has the wrong shape.
    ///
    /// Lists every offending field so the caller can report all of them
    /// at once.
    #[error("malformed document: missing or invalid required field(s): {}", fields.join(", "))]
    Malformed { fields: Vec<String> },
    /// The document passed the shape check but could not be deserialized.
    #[error("could not deserialize document: {source}")]
    Deserialize {
        #[from]
        source: serde_json::Error,
    },
}

impl DocumentError {
    /// Construct a `Malformed` error from the missing or invalid fields.
    pub(crate) fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DocumentError::Malformed {
            fields: fields.into_iter().map(|field| field.into()).collect(),
        }
    }
}
