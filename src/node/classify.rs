//! Decide a node's logical kind from its text and entity kind hint.

use regex::Regex;

use crate::{consts::IMAGE_KIND, node::NodeKind, tag::pattern};

/// Classify a node from its raw text and the entity's declared kind.
///
/// An image-typed entity is always a video. Otherwise the first matching
/// rule in a fixed priority order applies; a node is never reclassified
/// after this decision.
pub fn classify(text: &str, kind_hint: &str) -> NodeKind {
    if kind_hint == IMAGE_KIND {
        return NodeKind::Video;
    }

    let rules: [(&Regex, NodeKind); 8] = [
        (&*pattern::TIP, NodeKind::Tip),
        (&*pattern::CARD, NodeKind::Card),
        (&*pattern::JUMP, NodeKind::Jump),
        (&*pattern::BGM, NodeKind::Bgm),
        (&*pattern::TASK, NodeKind::Task),
        (&*pattern::OPTION, NodeKind::Choice),
        (&*pattern::HOTSPOT, NodeKind::Choice),
        (&*pattern::BUBBLE, NodeKind::Choice),
    ];

    rules
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, kind)| *kind)
        .unwrap_or(NodeKind::Video)
}
