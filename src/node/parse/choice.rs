//! The choice and card extraction pipelines.
//!
//! Cards mirror choices: the pipelines differ only in the kind marker
//! (the option-family trio against `[card]`) and in that cards carry no
//! dynamic-text expression.

use crate::{
    node::{CardNode, ChoiceNode, ChoiceStyle, NodeData, Probability},
    tag::{pattern, ScalarValue, TagCursor},
};

/// Parse a choice node from its raw text.
///
/// Extraction order: ad marker, tier index, achievement, death, start,
/// option-kind strip, overlay image, hidden, early display, exactly one
/// probability marker chosen by priority, conditions, effects, optional
/// brace-delimited dynamic text. The remainder is the choice text.
pub(crate) fn parse_choice(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = ChoiceNode::default();

    super::strip_ad_marker(&mut cursor, &mut node.require_ad, &mut node.ad_type);

    strip_common(
        &mut cursor,
        &mut node.tier,
        &mut node.achievement,
        &mut node.death,
        &mut node.is_start,
    );

    node.style = strip_style(&mut cursor);

    let (overlay, clickable) = strip_overlay(&mut cursor);
    node.overlay = overlay;
    node.clickable = clickable;

    node.hidden = cursor.strip(&pattern::HIDDEN).is_some();
    node.early_display = cursor.strip(&pattern::EARLY_DISPLAY).is_some();

    node.probability = strip_probability(&mut cursor);
    node.conditions = super::collect_conditions(&mut cursor);
    node.effects = super::collect_effects(&mut cursor);

    if let Some(tag) = cursor.strip(&pattern::DYNAMIC_TEXT) {
        node.dynamic_text = tag.group(1).map(|expression| expression.trim().to_string());
    }

    node.text = cursor.into_remainder();

    NodeData::Choice(node)
}

/// Parse a card node. Same pipeline as a choice minus the dynamic text,
/// with the `[card]` marker stripped in place of the option kind.
pub(crate) fn parse_card(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = CardNode::default();

    super::strip_ad_marker(&mut cursor, &mut node.require_ad, &mut node.ad_type);

    strip_common(
        &mut cursor,
        &mut node.tier,
        &mut node.achievement,
        &mut node.death,
        &mut node.is_start,
    );

    cursor.strip(&pattern::CARD);

    let (overlay, clickable) = strip_overlay(&mut cursor);
    node.overlay = overlay;
    node.clickable = clickable;

    node.hidden = cursor.strip(&pattern::HIDDEN).is_some();
    node.early_display = cursor.strip(&pattern::EARLY_DISPLAY).is_some();

    node.probability = strip_probability(&mut cursor);
    node.conditions = super::collect_conditions(&mut cursor);
    node.effects = super::collect_effects(&mut cursor);

    node.text = cursor.into_remainder();

    NodeData::Card(node)
}

/// Strip the tier, achievement, death and start markers shared by both
/// pipelines, in that order.
fn strip_common(
    cursor: &mut TagCursor,
    tier: &mut Option<ScalarValue>,
    achievement: &mut Option<String>,
    death: &mut bool,
    is_start: &mut bool,
) {
    if let Some(tag) = cursor.strip(&pattern::TIER) {
        *tier = tag
            .group(1)
            .map(str::trim)
            .filter(|index| !index.is_empty())
            .map(ScalarValue::coerce);
    }

    if let Some(tag) = cursor.strip(&pattern::ACHIEVEMENT) {
        *achievement = tag
            .group(1)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from);
    }

    *death = cursor.strip(&pattern::DEATH).is_some();
    *is_start = cursor.strip(&pattern::START).is_some();
}

/// Strip whichever option-family marker is present.
fn strip_style(cursor: &mut TagCursor) -> ChoiceStyle {
    if cursor.strip(&pattern::OPTION).is_some() {
        ChoiceStyle::Standard
    } else if cursor.strip(&pattern::HOTSPOT).is_some() {
        ChoiceStyle::Hotspot
    } else if cursor.strip(&pattern::BUBBLE).is_some() {
        ChoiceStyle::Bubble
    } else {
        ChoiceStyle::default()
    }
}

/// Strip the overlay marker. The literal `false` means the option is not
/// clickable rather than naming an image.
fn strip_overlay(cursor: &mut TagCursor) -> (Option<String>, bool) {
    match cursor.strip(&pattern::OVERLAY) {
        Some(tag) => {
            let content = tag.group(1).unwrap_or("").trim();

            if content == "false" {
                (None, false)
            } else if content.is_empty() {
                (None, true)
            } else {
                (Some(content.to_string()), true)
            }
        }
        None => (None, true),
    }
}

/// Strip exactly one probability marker, forms tried in priority order:
/// count-bounded, then simple percentage, then variable expression.
fn strip_probability(cursor: &mut TagCursor) -> Option<Probability> {
    if let Some(tag) = cursor.strip(&pattern::PROBABILITY_COUNT) {
        let percent = tag.group(1)?.parse().ok()?;
        let max_count = tag.group(2)?.parse().ok()?;

        return Some(Probability::CountBounded { percent, max_count });
    }

    if let Some(tag) = cursor.strip(&pattern::PROBABILITY_PERCENT) {
        let percent = tag.group(1)?.parse().ok()?;

        return Some(Probability::Percent { percent });
    }

    if let Some(tag) = cursor.strip(&pattern::PROBABILITY_EXPRESSION) {
        let variable = tag.group(1)?.trim().to_string();

        return Some(Probability::Expression { variable });
    }

    None
}
