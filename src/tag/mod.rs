//! Tags: bracket-delimited substrings embedded in node text.
//!
//! Four independent bracket families carry meaning inside a node label:
//! square brackets for flags, guillemets for conditions, probability and ad
//! markers, angle brackets for variable effects and curly braces for
//! arithmetic expressions. This module holds the extraction machinery
//! ([`TagCursor`]) together with the grammars shared by every node kind:
//! conditions, effects and the numeric-coercion rule.

mod condition;
mod cursor;
mod effect;
pub(crate) mod pattern;
mod scalar;

pub use condition::{parse_condition, CompareOp, Condition};
pub use effect::{parse_effect, Effect, EffectOp, EffectStyle};
pub use scalar::ScalarValue;

pub(crate) use condition::format_condition;
pub(crate) use cursor::{TagCursor, TagMatch};
pub(crate) use effect::format_effect;
