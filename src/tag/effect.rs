//! Parse and format `Effect` tags.

use serde::{Deserialize, Serialize};

use crate::{
    consts::ACCUMULATIVE_PREFIX,
    error::{BadTag, BadTagKind},
};

/// Operation applied to a variable by an effect. A closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum EffectOp {
    Set,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl EffectOp {
    pub fn symbol(&self) -> char {
        match self {
            EffectOp::Set => '=',
            EffectOp::Add => '+',
            EffectOp::Subtract => '-',
            EffectOp::Multiply => '*',
            EffectOp::Divide => '/',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '=' => Some(EffectOp::Set),
            '+' => Some(EffectOp::Add),
            '-' => Some(EffectOp::Subtract),
            '*' => Some(EffectOp::Multiply),
            '/' => Some(EffectOp::Divide),
            _ => None,
        }
    }
}

/// Whether an effect's value persists cumulatively across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum EffectStyle {
    Normal,
    Accumulative,
}

impl Default for EffectStyle {
    fn default() -> Self {
        EffectStyle::Normal
    }
}

/// An angle bracket effect mutating a variable: `<var OP value>`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Effect {
    #[serde(rename = "variableName")]
    pub variable: String,
    pub operation: EffectOp,
    pub value: String,
    pub style: EffectStyle,
}

/// Parse the content of an effect angle bracket.
///
/// The grammar is `var`, `var = value` or `var OP value` for the four
/// arithmetic operators; an operator may also be written `OP=` as in
/// `+=`. A leading `A:` marks the effect as accumulative. A bare variable
/// with no operator and no value is a no-op `Set`, and the inverted form
/// `= var` is a documented alias for the same thing.
pub fn parse_effect(content: &str) -> Result<Effect, BadTag> {
    let mut body = content.trim();

    let style = if body.starts_with(ACCUMULATIVE_PREFIX) {
        body = body[ACCUMULATIVE_PREFIX.len()..].trim_start();
        EffectStyle::Accumulative
    } else {
        EffectStyle::Normal
    };

    if body.is_empty() {
        return Err(BadTag::from_kind(content, BadTagKind::EmptyVariable));
    }

    // Inverted alias: `= var` is a bare set on `var`.
    if let Some(rest) = body.strip_prefix('=') {
        return bare_set(content, rest.trim(), style);
    }

    let operator_hit = body
        .char_indices()
        .find(|(_, c)| EffectOp::from_symbol(*c).is_some());

    let (index, symbol) = match operator_hit {
        Some(hit) => hit,
        None => return bare_set(content, body, style),
    };

    let variable = body[..index].trim();
    if variable.is_empty() {
        return Err(BadTag::from_kind(content, BadTagKind::EmptyVariable));
    }

    let operation = EffectOp::from_symbol(symbol)
        .ok_or_else(|| BadTag::from_kind(content, BadTagKind::UnknownOperator))?;

    // Accept the compound `+=` spelling by dropping the extra `=`.
    let mut rest = &body[index + symbol.len_utf8()..];
    if operation != EffectOp::Set {
        rest = rest.trim_start().trim_start_matches('=');
    }

    let value = rest.trim();

    if value.is_empty() && operation != EffectOp::Set {
        return Err(BadTag::from_kind(content, BadTagKind::EmptyOperand));
    }

    Ok(Effect {
        variable: variable.to_string(),
        operation,
        value: value.to_string(),
        style,
    })
}

/// Build the no-op `Set` for a bare variable name.
fn bare_set(content: &str, variable: &str, style: EffectStyle) -> Result<Effect, BadTag> {
    if variable.is_empty() {
        return Err(BadTag::from_kind(content, BadTagKind::EmptyVariable));
    }

    let invalid = variable
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '!'));

    if invalid {
        return Err(BadTag::from_kind(content, BadTagKind::BadPayload));
    }

    Ok(Effect {
        variable: variable.to_string(),
        operation: EffectOp::Set,
        value: String::new(),
        style,
    })
}

/// Format an effect back to angle bracket content.
///
/// The operation maps to its symbol, an accumulative style prefixes `A:`
/// and the value suffix is omitted entirely when the value is empty.
pub(crate) fn format_effect(effect: &Effect) -> String {
    let prefix = match effect.style {
        EffectStyle::Accumulative => ACCUMULATIVE_PREFIX,
        EffectStyle::Normal => "",
    };

    if effect.value.is_empty() && effect.operation == EffectOp::Set {
        format!("{}{}", prefix, effect.variable)
    } else if effect.operation == EffectOp::Set {
        format!("{}{} = {}", prefix, effect.variable, effect.value)
    } else {
        format!(
            "{}{} {}{}",
            prefix,
            effect.variable,
            effect.operation.symbol(),
            effect.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_effect_parses_variable_operation_and_value() {
        let effect = parse_effect("gold +10").unwrap();

        assert_eq!(&effect.variable, "gold");
        assert_eq!(effect.operation, EffectOp::Add);
        assert_eq!(&effect.value, "10");
        assert_eq!(effect.style, EffectStyle::Normal);
    }

    #[test]
    fn accumulative_prefix_marks_the_style() {
        let effect = parse_effect("A:gold +10").unwrap();

        assert_eq!(&effect.variable, "gold");
        assert_eq!(effect.operation, EffectOp::Add);
        assert_eq!(&effect.value, "10");
        assert_eq!(effect.style, EffectStyle::Accumulative);
    }

    #[test]
    fn inverted_assignment_is_an_alias_for_a_bare_set() {
        let effect = parse_effect("=health").unwrap();

        assert_eq!(&effect.variable, "health");
        assert_eq!(effect.operation, EffectOp::Set);
        assert_eq!(&effect.value, "");
    }

    #[test]
    fn bare_variable_is_a_no_op_set() {
        let effect = parse_effect("health").unwrap();

        assert_eq!(&effect.variable, "health");
        assert_eq!(effect.operation, EffectOp::Set);
        assert_eq!(&effect.value, "");
    }

    #[test]
    fn compound_operator_spellings_are_accepted() {
        let effect = parse_effect("体力+=10").unwrap();

        assert_eq!(&effect.variable, "体力");
        assert_eq!(effect.operation, EffectOp::Add);
        assert_eq!(&effect.value, "10");
    }

    #[test]
    fn every_arithmetic_operator_parses() {
        assert_eq!(parse_effect("v +1").unwrap().operation, EffectOp::Add);
        assert_eq!(parse_effect("v -1").unwrap().operation, EffectOp::Subtract);
        assert_eq!(parse_effect("v *2").unwrap().operation, EffectOp::Multiply);
        assert_eq!(parse_effect("v /2").unwrap().operation, EffectOp::Divide);
        assert_eq!(parse_effect("v = 1").unwrap().operation, EffectOp::Set);
    }

    #[test]
    fn effects_without_a_variable_name_are_rejected() {
        assert!(parse_effect("").is_err());
        assert!(parse_effect("+10").is_err());
        assert!(parse_effect("=").is_err());
        assert!(parse_effect("A:").is_err());
    }

    #[test]
    fn arithmetic_effect_without_a_value_is_rejected() {
        match parse_effect("gold +") {
            Err(BadTag {
                kind: BadTagKind::EmptyOperand,
                ..
            }) => (),
            other => panic!("expected `EmptyOperand` but got {:?}", other),
        }
    }

    #[test]
    fn bare_names_containing_comparison_characters_are_rejected() {
        assert!(parse_effect("a>b").is_err());
        assert!(parse_effect("two words").is_err());
    }

    #[test]
    fn formatting_round_trips_through_the_parser() {
        let effects = vec![
            parse_effect("gold +10").unwrap(),
            parse_effect("A:gold -2").unwrap(),
            parse_effect("score = 5").unwrap(),
            parse_effect("health").unwrap(),
            parse_effect("=health").unwrap(),
        ];

        for effect in &effects {
            let formatted = format_effect(effect);
            let reparsed = parse_effect(&formatted).unwrap();

            assert_eq!(&reparsed, effect, "failed for '{}'", formatted);
        }
    }
}
