//! Errors from parsing a single tag.

use thiserror::Error;

/// Error from parsing one bracket-delimited tag.
///
/// Always scoped to a single field of a single node: the caller logs the
/// error, leaves the field at its documented default and keeps importing.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("invalid tag '{text}': {kind}")]
pub struct BadTag {
    /// Content of the tag that could not be parsed.
    pub text: String,
    /// Which part of the tag was invalid.
    pub kind: BadTagKind,
}

/// Variants of invalid tag content.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum BadTagKind {
    /// A condition had no comparison operator.
    #[error("no comparison operator")]
    MissingOperator,
    /// A condition operand or effect value was empty where one is required.
    #[error("empty operand")]
    EmptyOperand,
    /// An effect had no variable name.
    #[error("no variable name")]
    EmptyVariable,
    /// The operator or operation is outside the closed set.
    #[error("unrecognized operator")]
    UnknownOperator,
    /// A marker payload did not match its documented shape.
    #[error("malformed marker payload")]
    BadPayload,
}

impl BadTag {
    pub(crate) fn from_kind(text: &str, kind: BadTagKind) -> Self {
        BadTag {
            text: text.to_string(),
            kind,
        }
    }
}
