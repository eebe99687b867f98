//! The video extraction pipeline.

use tracing::debug;

use crate::{
    node::{Dialogue, NodeData, VariableBar, VideoNode},
    tag::{pattern, TagCursor},
};

/// Parse a video node from its raw text.
///
/// Extraction order: start marker, checkpoint (named before plain), loop,
/// random time window, dialogue, memory, death, endpoint, black screen,
/// rewind, jump point, random-weight guillemet, analytics key, variable
/// bar, commerce showcase, then conditions and effects. The remainder is
/// the display name.
pub(crate) fn parse(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = VideoNode::default();

    node.is_start = cursor.strip(&pattern::START).is_some();

    if let Some(tag) = cursor.strip(&pattern::CHECKPOINT_NAMED) {
        node.checkpoint = true;
        node.checkpoint_name = tag.group(1).map(|name| name.trim().to_string());
    } else {
        node.checkpoint = cursor.strip(&pattern::CHECKPOINT).is_some();
    }

    node.looped = cursor.strip(&pattern::LOOP).is_some();

    if let Some(tag) = cursor.strip(&pattern::RANDOM_WINDOW) {
        node.random_window = parse_window(tag.group(1), tag.group(2));
    }

    if let Some(tag) = cursor.strip(&pattern::SAY) {
        node.dialogue = parse_dialogue(tag.group(1).unwrap_or(""));
    }

    node.memory = cursor.strip(&pattern::MEMORY).is_some();
    node.death = cursor.strip(&pattern::DEATH).is_some();
    node.endpoint = cursor.strip(&pattern::ENDPOINT).is_some();
    node.black_screen = cursor.strip(&pattern::BLACK_SCREEN).is_some();
    node.rewind = cursor.strip(&pattern::REWIND).is_some();
    node.anchor = cursor.strip(&pattern::ANCHOR).is_some();

    // Bare-number guillemet only; percentage-shaped content is left for
    // the condition scan to reject.
    if let Some(tag) = cursor.strip(&pattern::RANDOM_WEIGHT) {
        node.random_weight = tag.group(1).and_then(|weight| weight.parse().ok());
    }

    if let Some(tag) = cursor.strip(&pattern::TRACK) {
        node.analytics_key = tag
            .group(1)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from);
    }

    if let Some(tag) = cursor.strip(&pattern::VARIABLE_BAR) {
        node.variable_bar = parse_bar(tag.group(1).unwrap_or(""));
    }

    if let Some(tag) = cursor.strip(&pattern::SHOP) {
        node.shop_items = tag
            .group(1)
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();
    }

    node.conditions = super::collect_conditions(&mut cursor);
    node.effects = super::collect_effects(&mut cursor);

    node.name = cursor.into_remainder();

    NodeData::Video(node)
}

fn parse_window(min: Option<&str>, max: Option<&str>) -> Option<(f64, f64)> {
    let min: f64 = min.and_then(|value| value.parse().ok())?;
    let max: f64 = max.and_then(|value| value.parse().ok())?;

    Some((min, max))
}

/// Parse dialogue content: `text|audio` or `speaker|text|audio`.
fn parse_dialogue(content: &str) -> Option<Dialogue> {
    let parts: Vec<&str> = content.split('|').map(str::trim).collect();

    match parts.as_slice() {
        [text, audio] if !audio.is_empty() => Some(Dialogue {
            speaker: None,
            text: text.to_string(),
            audio: audio.to_string(),
        }),
        [speaker, text, audio] if !audio.is_empty() => Some(Dialogue {
            speaker: Some(speaker.to_string()),
            text: text.to_string(),
            audio: audio.to_string(),
        }),
        _ => {
            debug!(tag = content, "dropping malformed dialogue marker");
            None
        }
    }
}

/// Parse a variable bar: name, six-digit hex color, screen position.
fn parse_bar(content: &str) -> Option<VariableBar> {
    let parts: Vec<&str> = content.split_whitespace().collect();

    match parts.as_slice() {
        [variable, color, position] if pattern::HEX_COLOR.is_match(color) => Some(VariableBar {
            variable: variable.to_string(),
            color: color.to_string(),
            position: position.to_string(),
        }),
        _ => {
            debug!(tag = content, "dropping malformed variable bar marker");
            None
        }
    }
}
