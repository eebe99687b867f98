//! Loosely typed values stripped from tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stripped tag value that is either a number or a string.
///
/// The coercion rule is uniform across every parser: a value that parses
/// as a finite number is stored numerically, anything else is retained
/// as the original string.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// Apply the numeric-coercion rule to a stripped value.
    pub fn coerce(text: &str) -> Self {
        let trimmed = text.trim();

        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => ScalarValue::Number(number),
            _ => ScalarValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(number) => Some(*number),
            ScalarValue::Text(_) => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarValue::Number(number) => write!(f, "{}", number),
            ScalarValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(number: f64) -> Self {
        ScalarValue::Number(number)
    }
}

impl From<&str> for ScalarValue {
    fn from(text: &str) -> Self {
        ScalarValue::Text(text.to_string())
    }
}
