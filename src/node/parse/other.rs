//! The smaller extraction pipelines: bgm, jump, task and tip.

use crate::{
    node::{BgmNode, JumpNode, NodeData, TaskNode, TipNode},
    tag::{pattern, ScalarValue, TagCursor},
};

/// Parse a background-music node: kind marker, volume assignment, name.
pub(crate) fn parse_bgm(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = BgmNode::default();

    cursor.strip(&pattern::BGM);

    if let Some(tag) = cursor.strip(&pattern::VOLUME) {
        node.volume = tag
            .group(1)
            .map(str::trim)
            .filter(|volume| !volume.is_empty())
            .map(ScalarValue::coerce);
    }

    node.name = cursor.into_remainder();

    NodeData::Bgm(node)
}

/// Parse a jump node: target marker, then effects stripped for text
/// cleanup only. Jump nodes never persist effects.
pub(crate) fn parse_jump(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = JumpNode::default();

    if let Some(tag) = cursor.strip(&pattern::JUMP) {
        node.target = tag.group(1).unwrap_or("").trim().to_string();
    }

    cursor.strip_all(&pattern::EFFECT);

    node.text = cursor.into_remainder();

    NodeData::Jump(node)
}

/// Parse a task node: the `(maxCount)`-parameterized marker, then name.
pub(crate) fn parse_task(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = TaskNode::default();

    if let Some(tag) = cursor.strip(&pattern::TASK) {
        if let Some(count) = tag.group(1).and_then(|count| count.parse().ok()) {
            node.max_count = count;
        }
    }

    node.name = cursor.into_remainder();

    NodeData::Task(node)
}

/// Parse a tip node: body marker, then ad marker.
pub(crate) fn parse_tip(text: &str) -> NodeData {
    let mut cursor = TagCursor::new(text);
    let mut node = TipNode::default();

    if let Some(tag) = cursor.strip(&pattern::TIP) {
        node.body = tag.group(1).unwrap_or("").trim().to_string();
    }

    super::strip_ad_marker(&mut cursor, &mut node.require_ad, &mut node.ad_type);

    node.name = cursor.into_remainder();

    NodeData::Tip(node)
}
