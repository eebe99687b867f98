//! Inverse of the per-kind parsers: structured record to canonical tag text.
//!
//! Every pipeline emits its tags in exactly the order its parser strips
//! them, with the display text appended last, so that parsing the emitted
//! text reproduces an equivalent record.

use crate::{
    consts::{
        AD_FULLSCREEN_MARKER, AD_REWARDED_MARKER, ANCHOR_MARKER, BGM_MARKER, BLACK_SCREEN_MARKER,
        BUBBLE_MARKER, CARD_MARKER, CHECKPOINT_MARKER, DEATH_MARKER, EARLY_DISPLAY_MARKER,
        ENDPOINT_MARKER, HIDDEN_MARKER, HOTSPOT_MARKER, LOOP_MARKER, MEMORY_MARKER, OPTION_MARKER,
        REWIND_MARKER, START_MARKER,
    },
    node::{
        AdType, BgmNode, CardNode, ChoiceNode, ChoiceStyle, JumpNode, NodeData, Probability,
        TaskNode, TipNode, VideoNode,
    },
    tag::{format_condition, format_effect, Condition, Effect, ScalarValue},
};

pub(crate) fn video(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Video(node) => Some(video_text(node)),
        _ => None,
    }
}

pub(crate) fn choice(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Choice(node) => Some(choice_text(node)),
        _ => None,
    }
}

pub(crate) fn card(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Card(node) => Some(card_text(node)),
        _ => None,
    }
}

pub(crate) fn bgm(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Bgm(node) => Some(bgm_text(node)),
        _ => None,
    }
}

pub(crate) fn jump(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Jump(node) => Some(jump_text(node)),
        _ => None,
    }
}

pub(crate) fn task(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Task(node) => Some(task_text(node)),
        _ => None,
    }
}

pub(crate) fn tip(data: &NodeData) -> Option<String> {
    match data {
        NodeData::Tip(node) => Some(tip_text(node)),
        _ => None,
    }
}

fn video_text(node: &VideoNode) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_flag(&mut parts, node.is_start, START_MARKER);

    if node.checkpoint {
        match &node.checkpoint_name {
            Some(name) => parts.push(format!("[checkpoint:{}]", name)),
            None => parts.push(CHECKPOINT_MARKER.to_string()),
        }
    }

    push_flag(&mut parts, node.looped, LOOP_MARKER);

    if let Some((min, max)) = node.random_window {
        parts.push(format!("({}-{})", min, max));
    }

    if let Some(dialogue) = &node.dialogue {
        match &dialogue.speaker {
            Some(speaker) => {
                parts.push(format!("[say:{}|{}|{}]", speaker, dialogue.text, dialogue.audio))
            }
            None => parts.push(format!("[say:{}|{}]", dialogue.text, dialogue.audio)),
        }
    }

    push_flag(&mut parts, node.memory, MEMORY_MARKER);
    push_flag(&mut parts, node.death, DEATH_MARKER);
    push_flag(&mut parts, node.endpoint, ENDPOINT_MARKER);
    push_flag(&mut parts, node.black_screen, BLACK_SCREEN_MARKER);
    push_flag(&mut parts, node.rewind, REWIND_MARKER);
    push_flag(&mut parts, node.anchor, ANCHOR_MARKER);

    if let Some(weight) = node.random_weight {
        parts.push(format!("《{}》", weight));
    }

    if let Some(key) = &node.analytics_key {
        parts.push(format!("[track:{}]", key));
    }

    if let Some(bar) = &node.variable_bar {
        parts.push(format!("[bar:{} {} {}]", bar.variable, bar.color, bar.position));
    }

    if !node.shop_items.is_empty() {
        parts.push(format!("[shop:{}]", node.shop_items.join(";")));
    }

    push_conditions(&mut parts, &node.conditions);
    push_effects(&mut parts, &node.effects);
    push_text(&mut parts, &node.name);

    parts.join(" ")
}

fn choice_text(node: &ChoiceNode) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_ad_marker(&mut parts, node.require_ad, node.ad_type);
    push_tier(&mut parts, &node.tier);
    push_achievement(&mut parts, &node.achievement);
    push_flag(&mut parts, node.death, DEATH_MARKER);
    push_flag(&mut parts, node.is_start, START_MARKER);

    parts.push(
        match node.style {
            ChoiceStyle::Standard => OPTION_MARKER,
            ChoiceStyle::Hotspot => HOTSPOT_MARKER,
            ChoiceStyle::Bubble => BUBBLE_MARKER,
        }
        .to_string(),
    );

    push_overlay(&mut parts, &node.overlay, node.clickable);
    push_flag(&mut parts, node.hidden, HIDDEN_MARKER);
    push_flag(&mut parts, node.early_display, EARLY_DISPLAY_MARKER);
    push_probability(&mut parts, &node.probability);
    push_conditions(&mut parts, &node.conditions);
    push_effects(&mut parts, &node.effects);

    if let Some(expression) = &node.dynamic_text {
        parts.push(format!("{{{}}}", expression));
    }

    push_text(&mut parts, &node.text);

    parts.join(" ")
}

fn card_text(node: &CardNode) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_ad_marker(&mut parts, node.require_ad, node.ad_type);
    push_tier(&mut parts, &node.tier);
    push_achievement(&mut parts, &node.achievement);
    push_flag(&mut parts, node.death, DEATH_MARKER);
    push_flag(&mut parts, node.is_start, START_MARKER);

    parts.push(CARD_MARKER.to_string());

    push_overlay(&mut parts, &node.overlay, node.clickable);
    push_flag(&mut parts, node.hidden, HIDDEN_MARKER);
    push_flag(&mut parts, node.early_display, EARLY_DISPLAY_MARKER);
    push_probability(&mut parts, &node.probability);
    push_conditions(&mut parts, &node.conditions);
    push_effects(&mut parts, &node.effects);
    push_text(&mut parts, &node.text);

    parts.join(" ")
}

fn bgm_text(node: &BgmNode) -> String {
    let mut parts: Vec<String> = vec![BGM_MARKER.to_string()];

    if let Some(volume) = &node.volume {
        parts.push(format!("[vol:{}]", volume));
    }

    push_text(&mut parts, &node.name);

    parts.join(" ")
}

fn jump_text(node: &JumpNode) -> String {
    let mut parts: Vec<String> = vec![format!("[jump:{}]", node.target)];

    push_text(&mut parts, &node.text);

    parts.join(" ")
}

fn task_text(node: &TaskNode) -> String {
    let mut parts: Vec<String> = vec![format!("[task({})]", node.max_count)];

    push_text(&mut parts, &node.name);

    parts.join(" ")
}

fn tip_text(node: &TipNode) -> String {
    let mut parts: Vec<String> = vec![format!("[tip:{}]", node.body)];

    push_ad_marker(&mut parts, node.require_ad, node.ad_type);
    push_text(&mut parts, &node.name);

    parts.join(" ")
}

fn push_flag(parts: &mut Vec<String>, flag: bool, marker: &str) {
    if flag {
        parts.push(marker.to_string());
    }
}

fn push_text(parts: &mut Vec<String>, text: &str) {
    if !text.is_empty() {
        parts.push(text.to_string());
    }
}

fn push_ad_marker(parts: &mut Vec<String>, require_ad: bool, ad_type: AdType) {
    if require_ad {
        parts.push(
            match ad_type {
                AdType::Fullscreen => AD_FULLSCREEN_MARKER,
                AdType::Rewarded => AD_REWARDED_MARKER,
            }
            .to_string(),
        );
    }
}

fn push_tier(parts: &mut Vec<String>, tier: &Option<ScalarValue>) {
    if let Some(tier) = tier {
        parts.push(format!("[tier:{}]", tier));
    }
}

fn push_achievement(parts: &mut Vec<String>, achievement: &Option<String>) {
    if let Some(name) = achievement {
        parts.push(format!("[achieve:{}]", name));
    }
}

fn push_overlay(parts: &mut Vec<String>, overlay: &Option<String>, clickable: bool) {
    if !clickable {
        parts.push("[overlay:false]".to_string());
    } else if let Some(image) = overlay {
        parts.push(format!("[overlay:{}]", image));
    }
}

fn push_probability(parts: &mut Vec<String>, probability: &Option<Probability>) {
    match probability {
        Some(Probability::CountBounded { percent, max_count }) => {
            parts.push(format!("《{}%*{}》", percent, max_count))
        }
        Some(Probability::Percent { percent }) => parts.push(format!("《{}%》", percent)),
        Some(Probability::Expression { variable }) => parts.push(format!("《{}%》", variable)),
        None => (),
    }
}

fn push_conditions(parts: &mut Vec<String>, conditions: &[Condition]) {
    for condition in conditions {
        parts.push(format!("《{}》", format_condition(condition)));
    }
}

fn push_effects(parts: &mut Vec<String>, effects: &[Effect]) {
    for effect in effects {
        parts.push(format!("<{}>", format_effect(effect)));
    }
}
