//! Discover the variable catalog from node content.
//!
//! Import builds a name-to-metadata map by scanning every node's parsed
//! conditions and effects plus six raw-text patterns that the per-kind
//! parsers do not otherwise capture. The inferred catalog is then merged
//! with any explicit catalog, which wins on every field.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    consts::{COMPARE_SYMBOLS, SHOP_VARIABLES},
    node::{NodeData, Probability, StoryNode},
    tag::{pattern, EffectStyle},
    variable::{Persistence, Variable},
};

// Raw-text patterns: increment/decrement shorthand, bare assignment and
// accumulative-prefixed references. The guillemet, brace and variable-bar
// scans reuse the shared tag patterns.
static INCREMENT_SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*(?:\+\+|--|\+=|-=)").unwrap());
static BARE_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\s*=").unwrap());
static ACCUMULATIVE_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"A:(\w+)").unwrap());

static PURELY_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?$").unwrap());
static PERCENTAGE_SHAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?%$").unwrap());

/// Characters trimmed off both ends of a candidate name.
const OPERATOR_CHARS: &[char] = &['=', '!', '<', '>', '+', '-', '*', '/', '%'];

#[derive(Clone, Debug, Default)]
struct Candidate {
    accumulative: bool,
    show_as_progress: bool,
    min_value: Option<f64>,
    max_value: Option<f64>,
}

/// Collector for inferred variables. Every name is registered exactly
/// once, in first-seen order.
#[derive(Debug, Default)]
pub struct VariableInference {
    order: Vec<String>,
    candidates: HashMap<String, Candidate>,
}

impl VariableInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Harvest names from a node's parsed conditions, effects and
    /// kind-specific fields.
    pub fn harvest_node(&mut self, node: &StoryNode) {
        match &node.data {
            NodeData::Video(video) => {
                self.harvest_records(&video.conditions, &video.effects);

                if let Some(bar) = &video.variable_bar {
                    let name = bar.variable.clone();

                    if let Some(candidate) = self.register(&name) {
                        candidate.show_as_progress = true;
                    }
                }
            }
            NodeData::Choice(choice) => {
                self.harvest_records(&choice.conditions, &choice.effects);
                self.harvest_probability(&choice.probability);

                if let Some(expression) = &choice.dynamic_text {
                    self.harvest_expression(expression);
                }
            }
            NodeData::Card(card) => {
                self.harvest_records(&card.conditions, &card.effects);
                self.harvest_probability(&card.probability);
            }
            _ => (),
        }
    }

    /// Harvest names from the six raw-text patterns.
    pub fn harvest_text(&mut self, text: &str) {
        for captures in INCREMENT_SHORTHAND.captures_iter(text) {
            if let Some(name) = captures.get(1) {
                self.register(name.as_str());
            }
        }

        // A bare assignment, rejecting `==` comparisons by looking one
        // byte past the match.
        for captures in BARE_ASSIGNMENT.captures_iter(text) {
            let whole = match captures.get(0) {
                Some(whole) => whole,
                None => continue,
            };

            if text.as_bytes().get(whole.end()) == Some(&b'=') {
                continue;
            }

            if let Some(name) = captures.get(1) {
                self.register(name.as_str());
            }
        }

        for captures in ACCUMULATIVE_REFERENCE.captures_iter(text) {
            if let Some(name) = captures.get(1) {
                self.register(name.as_str());
            }
        }

        // Guillemet operands on both sides of the comparison.
        for captures in pattern::GUILLEMET.captures_iter(text) {
            if let Some(content) = captures.get(1) {
                self.harvest_comparison(content.as_str());
            }
        }

        // Brace-expression operands.
        for captures in pattern::DYNAMIC_TEXT.captures_iter(text) {
            if let Some(expression) = captures.get(1) {
                self.harvest_expression(expression.as_str());
            }
        }

        // Variable-bar declarations.
        for captures in pattern::VARIABLE_BAR.captures_iter(text) {
            let name = captures
                .get(1)
                .and_then(|content| content.as_str().split_whitespace().next())
                .map(str::to_string);

            if let Some(name) = name {
                if let Some(candidate) = self.register(&name) {
                    candidate.show_as_progress = true;
                }
            }
        }
    }

    /// Build the inferred catalog in first-seen order.
    pub fn finish(self) -> Vec<Variable> {
        let VariableInference { order, candidates } = self;

        order
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let candidate = candidates.get(&name).cloned().unwrap_or_default();

                let persistence = if SHOP_VARIABLES.contains(&name.as_str()) {
                    Persistence::Shop
                } else if candidate.accumulative {
                    Persistence::Accumulative
                } else {
                    Persistence::ChapterConstant
                };

                Variable {
                    persistence,
                    show_as_progress: candidate.show_as_progress,
                    min_value: candidate.min_value,
                    max_value: candidate.max_value,
                    order: index as u32,
                    ..Variable::named(&name)
                }
            })
            .collect()
    }

    fn harvest_records(
        &mut self,
        conditions: &[crate::tag::Condition],
        effects: &[crate::tag::Effect],
    ) {
        for condition in conditions {
            self.register(&condition.variable);
            self.register(&condition.value);
        }

        for effect in effects {
            let accumulative = effect.style == EffectStyle::Accumulative;
            let name = effect.variable.clone();

            if let Some(candidate) = self.register(&name) {
                candidate.accumulative |= accumulative;
            }
        }
    }

    fn harvest_probability(&mut self, probability: &Option<Probability>) {
        if let Some(Probability::Expression { variable }) = probability {
            let name = variable.clone();

            if let Some(candidate) = self.register(&name) {
                candidate.min_value = Some(0.0);
                candidate.max_value = Some(100.0);
            }
        }
    }

    /// Register both operands of a comparison, or the whole span when it
    /// has no operator.
    fn harvest_comparison(&mut self, content: &str) {
        let hit = COMPARE_SYMBOLS
            .iter()
            .find_map(|symbol| content.find(symbol).map(|index| (index, symbol.len())));

        match hit {
            Some((index, length)) => {
                let left = content[..index].to_string();
                let right = content[index + length..].to_string();

                self.register(&left);
                self.register(&right);
            }
            None => {
                self.register(content);
            }
        }
    }

    /// Register every operand of an arithmetic expression.
    fn harvest_expression(&mut self, expression: &str) {
        let operands: Vec<String> = expression
            .split(|c: char| c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')'))
            .map(str::to_string)
            .collect();

        for operand in operands {
            self.register(&operand);
        }
    }

    /// Trim and filter a candidate name, registering it on first sight.
    ///
    /// Returns the candidate metadata for the caller to update, or `None`
    /// when the name was rejected.
    fn register(&mut self, raw: &str) -> Option<&mut Candidate> {
        let name = raw
            .trim()
            .trim_matches(|c: char| OPERATOR_CHARS.contains(&c) || c.is_whitespace());

        if name.is_empty()
            || PURELY_NUMERIC.is_match(name)
            || PERCENTAGE_SHAPED.is_match(name)
        {
            return None;
        }

        if !self.candidates.contains_key(name) {
            self.order.push(name.to_string());
            self.candidates.insert(name.to_string(), Candidate::default());
        }

        self.candidates.get_mut(name)
    }
}

/// Merge an explicit variable catalog with the inferred one.
///
/// The explicit catalog wins on every field. Inferred names absent from it
/// are returned as a separate supplemental list for review rather than
/// silently injected. Inferred display hints are applied to an explicit
/// entry only while that entry still holds unmodified factory defaults.
pub fn merge_variables(
    explicit: &[Variable],
    inferred: Vec<Variable>,
) -> (Vec<Variable>, Vec<Variable>) {
    let mut merged = explicit.to_vec();
    let mut supplemental = Vec::new();

    for inferred_entry in inferred {
        match merged
            .iter_mut()
            .find(|variable| variable.name == inferred_entry.name)
        {
            Some(existing) => {
                if existing.has_default_hints() {
                    existing.min_value = inferred_entry.min_value;
                    existing.max_value = inferred_entry.max_value;
                    existing.show_as_progress = inferred_entry.show_as_progress;
                }
            }
            None => supplemental.push(inferred_entry),
        }
    }

    (merged, supplemental)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inferred_names(text: &str) -> Vec<String> {
        let mut inference = VariableInference::new();
        inference.harvest_text(text);

        inference
            .finish()
            .into_iter()
            .map(|variable| variable.name)
            .collect()
    }

    #[test]
    fn condition_and_effect_text_registers_each_name_exactly_once() {
        let mut names = inferred_names("《金币>100》<体力+=10>");
        names.sort();

        assert_eq!(names, vec!["体力", "金币"]);
    }

    #[test]
    fn purely_numeric_and_percentage_shaped_candidates_are_rejected() {
        assert!(inferred_names("《100>50》《30%》").is_empty());
    }

    #[test]
    fn bare_assignment_registers_but_comparison_does_not() {
        assert_eq!(inferred_names("score = 5"), vec!["score"]);
        assert!(inferred_names("score == 5").iter().all(|n| n == "score"));
    }

    #[test]
    fn accumulative_references_register_their_name() {
        assert_eq!(inferred_names("<A:gold +5>"), vec!["gold"]);
    }

    #[test]
    fn brace_expression_operands_register() {
        assert_eq!(inferred_names("{gold / stake}"), vec!["gold", "stake"]);
    }

    #[test]
    fn variable_bar_declarations_register_with_a_progress_hint() {
        let mut inference = VariableInference::new();
        inference.harvest_text("[bar:energy #a1b2c3 top]");

        let variables = inference.finish();

        assert_eq!(variables.len(), 1);
        assert_eq!(&variables[0].name, "energy");
        assert!(variables[0].show_as_progress);
    }

    #[test]
    fn shop_allow_list_names_classify_as_shop_variables() {
        let mut inference = VariableInference::new();
        inference.harvest_text("《金币>100》《体力>1》");

        let variables = inference.finish();

        assert_eq!(variables[0].persistence, Persistence::Shop);
        assert_eq!(variables[1].persistence, Persistence::ChapterConstant);
    }

    #[test]
    fn accumulative_effects_classify_their_variable_as_accumulative() {
        let mut inference = VariableInference::new();

        let node = crate::story::parse_node_text("<A:progress +1> Scene", "topic");
        inference.harvest_node(&node);

        let variables = inference.finish();

        assert_eq!(variables[0].persistence, Persistence::Accumulative);
    }

    #[test]
    fn inference_assigns_first_seen_order() {
        let mut inference = VariableInference::new();
        inference.harvest_text("《b>1》《a>1》");

        let variables = inference.finish();

        assert_eq!(&variables[0].name, "b");
        assert_eq!(variables[0].order, 0);
        assert_eq!(&variables[1].name, "a");
        assert_eq!(variables[1].order, 1);
    }

    #[test]
    fn explicit_catalog_wins_and_extra_names_become_supplemental() {
        let explicit = vec![Variable {
            persistence: Persistence::Accumulative,
            ..Variable::named("gold")
        }];

        let inferred = vec![Variable::named("gold"), Variable::named("energy")];

        let (merged, supplemental) = merge_variables(&explicit, inferred);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].persistence, Persistence::Accumulative);

        assert_eq!(supplemental.len(), 1);
        assert_eq!(&supplemental[0].name, "energy");
    }

    #[test]
    fn inferred_hints_apply_only_to_factory_default_entries() {
        let explicit = vec![
            Variable::named("energy"),
            Variable {
                max_value: Some(50.0),
                ..Variable::named("rage")
            },
        ];

        let hinted = |name: &str| Variable {
            show_as_progress: true,
            max_value: Some(100.0),
            ..Variable::named(name)
        };

        let (merged, _) = merge_variables(&explicit, vec![hinted("energy"), hinted("rage")]);

        assert!(merged[0].show_as_progress);
        assert_eq!(merged[0].max_value, Some(100.0));

        assert!(!merged[1].show_as_progress);
        assert_eq!(merged[1].max_value, Some(50.0));
    }
}
