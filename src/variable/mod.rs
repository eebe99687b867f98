//! The global variable catalog.

pub(crate) mod infer;

use serde::{Deserialize, Serialize};

use crate::tag::ScalarValue;

pub use infer::{merge_variables, VariableInference};

/// How a variable's value persists between chapters and sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Persistence {
    ChapterConstant,
    Accumulative,
    Shop,
    #[serde(rename = "NULL")]
    Null,
}

impl Default for Persistence {
    fn default() -> Self {
        Persistence::ChapterConstant
    }
}

/// One entry of the variable catalog, explicit or inferred.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    #[serde(rename = "persistenceType")]
    pub persistence: Persistence,
    pub default_value: ScalarValue,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub show_as_progress: bool,
    pub order: u32,
}

impl Default for Variable {
    fn default() -> Self {
        Variable {
            name: String::new(),
            var_type: "number".to_string(),
            persistence: Persistence::default(),
            default_value: ScalarValue::Number(0.0),
            min_value: None,
            max_value: None,
            show_as_progress: false,
            order: 0,
        }
    }
}

impl Variable {
    pub fn named(name: &str) -> Self {
        Variable {
            name: name.to_string(),
            ..Variable::default()
        }
    }

    /// Whether the display hints still hold their factory defaults.
    ///
    /// Inferred min/max/progress hints may only be applied to an explicit
    /// entry while this is true; a deliberately set value is never
    /// overwritten.
    pub(crate) fn has_default_hints(&self) -> bool {
        self.min_value.is_none() && self.max_value.is_none() && !self.show_as_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_made_variables_have_default_hints() {
        assert!(Variable::named("gold").has_default_hints());
    }

    #[test]
    fn any_set_hint_marks_the_variable_as_deliberate() {
        let mut variable = Variable::named("gold");
        variable.max_value = Some(100.0);

        assert!(!variable.has_default_hints());
    }

    #[test]
    fn variables_serialize_with_the_catalog_field_names() {
        let variable = Variable::named("gold");
        let value = serde_json::to_value(&variable).unwrap();

        assert_eq!(value["name"], "gold");
        assert_eq!(value["type"], "number");
        assert_eq!(value["persistenceType"], "ChapterConstant");
        assert_eq!(value["defaultValue"], 0.0);
    }
}
