//! Parse and format `Condition` tags.

use serde::{Deserialize, Serialize};

use crate::{
    consts::COMPARE_SYMBOLS,
    error::{BadTag, BadTagKind},
};

/// Comparison operator of a condition. A closed set: content with any
/// other operator fails to parse as a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Ge),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }
}

/// A guillemet condition gating a node: `《left OP right》`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Condition {
    #[serde(rename = "variableName")]
    pub variable: String,
    pub operator: CompareOp,
    pub value: String,
}

/// Parse the content of a condition guillemet.
///
/// Operator symbols are tried in a fixed order with two-character symbols
/// before their one-character prefixes, so `>=` is never misread as `>`
/// followed by a stray `=`. Operands are trimmed of whitespace.
pub fn parse_condition(content: &str) -> Result<Condition, BadTag> {
    let (index, symbol) = COMPARE_SYMBOLS
        .iter()
        .find_map(|symbol| content.find(symbol).map(|index| (index, *symbol)))
        .ok_or_else(|| BadTag::from_kind(content, BadTagKind::MissingOperator))?;

    let variable = content[..index].trim();
    let value = content[index + symbol.len()..].trim();

    if variable.is_empty() || value.is_empty() {
        return Err(BadTag::from_kind(content, BadTagKind::EmptyOperand));
    }

    let operator = CompareOp::from_symbol(symbol)
        .ok_or_else(|| BadTag::from_kind(content, BadTagKind::UnknownOperator))?;

    Ok(Condition {
        variable: variable.to_string(),
        operator,
        value: value.to_string(),
    })
}

/// Format a condition back to guillemet content.
///
/// If the stored left operand already contains an operator character it is
/// a precomputed legacy expression: it is emitted verbatim and the operator
/// and right operand are not re-appended.
pub(crate) fn format_condition(condition: &Condition) -> String {
    let legacy = condition
        .variable
        .chars()
        .any(|c| matches!(c, '=' | '!' | '<' | '>'));

    if legacy {
        condition.variable.clone()
    } else {
        format!(
            "{}{}{}",
            condition.variable,
            condition.operator.symbol(),
            condition.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_parse_into_trimmed_operands() {
        let condition = parse_condition(" 金币 > 100 ").unwrap();

        assert_eq!(&condition.variable, "金币");
        assert_eq!(condition.operator, CompareOp::Gt);
        assert_eq!(&condition.value, "100");
    }

    #[test]
    fn two_character_operators_are_tried_before_their_prefixes() {
        assert_eq!(parse_condition("a>=1").unwrap().operator, CompareOp::Ge);
        assert_eq!(parse_condition("a<=1").unwrap().operator, CompareOp::Le);
        assert_eq!(parse_condition("a==1").unwrap().operator, CompareOp::Eq);
        assert_eq!(parse_condition("a!=1").unwrap().operator, CompareOp::Ne);
        assert_eq!(parse_condition("a>1").unwrap().operator, CompareOp::Gt);
        assert_eq!(parse_condition("a<1").unwrap().operator, CompareOp::Lt);
    }

    #[test]
    fn content_without_an_operator_is_rejected() {
        match parse_condition("no operator here") {
            Err(BadTag {
                kind: BadTagKind::MissingOperator,
                ..
            }) => (),
            other => panic!("expected `MissingOperator` but got {:?}", other),
        }
    }

    #[test]
    fn empty_operands_are_rejected() {
        assert!(parse_condition("> 100").is_err());
        assert!(parse_condition("gold >").is_err());
        assert!(parse_condition(">=").is_err());
    }

    #[test]
    fn formatting_maps_the_operator_back_to_its_symbol() {
        let condition = Condition {
            variable: "gold".to_string(),
            operator: CompareOp::Le,
            value: "5".to_string(),
        };

        assert_eq!(&format_condition(&condition), "gold<=5");
    }

    #[test]
    fn legacy_expressions_in_the_left_operand_are_emitted_verbatim() {
        let condition = Condition {
            variable: "gold>=100".to_string(),
            operator: CompareOp::Eq,
            value: "1".to_string(),
        };

        assert_eq!(&format_condition(&condition), "gold>=100");
    }

    #[test]
    fn conditions_serialize_with_symbolic_operators() {
        let condition = parse_condition("gold>=100").unwrap();
        let value = serde_json::to_value(&condition).unwrap();

        assert_eq!(value["variableName"], "gold");
        assert_eq!(value["operator"], ">=");
        assert_eq!(value["value"], "100");
    }
}
