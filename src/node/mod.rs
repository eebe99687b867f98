//! The story-graph data model: seven node kinds and their records.
//!
//! A node's kind is decided once, at parse time, by [`classify`] and never
//! reinterpreted. Each kind has a fixed-shape record with documented
//! defaults for every field; parsing and serializing a kind go through the
//! codec registry so that adding a kind touches exactly one table.

pub(crate) mod classify;
pub(crate) mod parse;
pub(crate) mod serialize;

use serde::{Deserialize, Serialize};

use crate::tag::{Condition, Effect, ScalarValue};

pub use classify::classify;

/// The seven logical node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Video,
    Choice,
    Card,
    Bgm,
    Jump,
    Task,
    Tip,
}

/// Canvas position of a node.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One node of the story graph.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryNode {
    pub id: String,
    pub position: Position,
    /// Resolved logical successors, skip entities already bypassed.
    pub next: Vec<String>,
    pub data: NodeData,
}

/// Tagged union over the per-kind records.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    Video(VideoNode),
    Choice(ChoiceNode),
    Card(CardNode),
    Bgm(BgmNode),
    Jump(JumpNode),
    Task(TaskNode),
    Tip(TipNode),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Video(_) => NodeKind::Video,
            NodeData::Choice(_) => NodeKind::Choice,
            NodeData::Card(_) => NodeKind::Card,
            NodeData::Bgm(_) => NodeKind::Bgm,
            NodeData::Jump(_) => NodeKind::Jump,
            NodeData::Task(_) => NodeKind::Task,
            NodeData::Tip(_) => NodeKind::Tip,
        }
    }

    /// Whether this node carries the start flag.
    pub fn is_start(&self) -> bool {
        match self {
            NodeData::Video(node) => node.is_start,
            NodeData::Choice(node) => node.is_start,
            NodeData::Card(node) => node.is_start,
            _ => false,
        }
    }
}

/// Which kind of advertisement a node requires before it unlocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Fullscreen,
    Rewarded,
}

impl Default for AdType {
    fn default() -> Self {
        AdType::Fullscreen
    }
}

/// Which of the three option-family markers a choice was written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceStyle {
    Standard,
    Hotspot,
    Bubble,
}

impl Default for ChoiceStyle {
    fn default() -> Self {
        ChoiceStyle::Standard
    }
}

/// Probability marker of a choice or card.
///
/// The three forms are mutually exclusive and resolved in a fixed priority
/// order while parsing: count-bounded, then simple percentage, then
/// variable expression.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Probability {
    #[serde(rename_all = "camelCase")]
    CountBounded { percent: f64, max_count: u32 },
    Percent { percent: f64 },
    Expression { variable: String },
}

/// A line of dubbed dialogue on a video node.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dialogue {
    pub speaker: Option<String>,
    pub text: String,
    pub audio: String,
}

/// An on-screen progress bar bound to a variable.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariableBar {
    #[serde(rename = "variableName")]
    pub variable: String,
    /// Six-digit hex color, `#` included.
    pub color: String,
    pub position: String,
}

/// A video segment. The default node kind.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoNode {
    /// Display name, whatever text remains after tag extraction.
    pub name: String,
    pub is_start: bool,
    pub checkpoint: bool,
    pub checkpoint_name: Option<String>,
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Random playback window in seconds, from the `(min-max)` marker.
    pub random_window: Option<(f64, f64)>,
    pub dialogue: Option<Dialogue>,
    pub memory: bool,
    pub death: bool,
    pub endpoint: bool,
    pub black_screen: bool,
    pub rewind: bool,
    /// Marked as a jump point that `Jump` nodes may target.
    pub anchor: bool,
    pub random_weight: Option<f64>,
    pub analytics_key: Option<String>,
    pub variable_bar: Option<VariableBar>,
    pub shop_items: Vec<String>,
    pub conditions: Vec<Condition>,
    pub effects: Vec<Effect>,
}

/// A selectable option presented over a video.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceNode {
    /// Choice button text, whatever remains after tag extraction.
    pub text: String,
    pub require_ad: bool,
    pub ad_type: AdType,
    pub tier: Option<ScalarValue>,
    pub achievement: Option<String>,
    pub death: bool,
    pub is_start: bool,
    pub style: ChoiceStyle,
    pub overlay: Option<String>,
    /// `false` when the overlay marker carried the literal `false`.
    pub clickable: bool,
    pub hidden: bool,
    pub early_display: bool,
    pub probability: Option<Probability>,
    pub conditions: Vec<Condition>,
    pub effects: Vec<Effect>,
    pub dynamic_text: Option<String>,
}

impl Default for ChoiceNode {
    fn default() -> Self {
        ChoiceNode {
            text: String::new(),
            require_ad: false,
            ad_type: AdType::default(),
            tier: None,
            achievement: None,
            death: false,
            is_start: false,
            style: ChoiceStyle::default(),
            overlay: None,
            clickable: true,
            hidden: false,
            early_display: false,
            probability: None,
            conditions: Vec::new(),
            effects: Vec::new(),
            dynamic_text: None,
        }
    }
}

/// A collectible card option. Mirrors `ChoiceNode` minus dynamic text.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardNode {
    pub text: String,
    pub require_ad: bool,
    pub ad_type: AdType,
    pub tier: Option<ScalarValue>,
    pub achievement: Option<String>,
    pub death: bool,
    pub is_start: bool,
    pub overlay: Option<String>,
    pub clickable: bool,
    pub hidden: bool,
    pub early_display: bool,
    pub probability: Option<Probability>,
    pub conditions: Vec<Condition>,
    pub effects: Vec<Effect>,
}

impl Default for CardNode {
    fn default() -> Self {
        CardNode {
            text: String::new(),
            require_ad: false,
            ad_type: AdType::default(),
            tier: None,
            achievement: None,
            death: false,
            is_start: false,
            overlay: None,
            clickable: true,
            hidden: false,
            early_display: false,
            probability: None,
            conditions: Vec::new(),
            effects: Vec::new(),
        }
    }
}

/// Background music control.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BgmNode {
    pub name: String,
    pub volume: Option<ScalarValue>,
}

/// A jump to an anchor elsewhere in the graph.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JumpNode {
    pub target: String,
    pub text: String,
}

/// A task the viewer can complete up to `max_count` times.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskNode {
    pub name: String,
    pub max_count: u32,
}

impl Default for TaskNode {
    fn default() -> Self {
        TaskNode {
            name: String::new(),
            max_count: 1,
        }
    }
}

/// An informational tip overlay.
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TipNode {
    pub body: String,
    pub require_ad: bool,
    pub ad_type: AdType,
    pub name: String,
}

/// Parse and serialize functions for one node kind.
pub(crate) struct KindCodec {
    pub parse: fn(&str) -> NodeData,
    pub serialize: fn(&NodeData) -> Option<String>,
}

/// The kind registry. Adding a node kind means adding one arm here and
/// implementing its pipeline pair.
pub(crate) fn codec(kind: NodeKind) -> KindCodec {
    match kind {
        NodeKind::Video => KindCodec {
            parse: parse::video::parse,
            serialize: serialize::video,
        },
        NodeKind::Choice => KindCodec {
            parse: parse::choice::parse_choice,
            serialize: serialize::choice,
        },
        NodeKind::Card => KindCodec {
            parse: parse::choice::parse_card,
            serialize: serialize::card,
        },
        NodeKind::Bgm => KindCodec {
            parse: parse::other::parse_bgm,
            serialize: serialize::bgm,
        },
        NodeKind::Jump => KindCodec {
            parse: parse::other::parse_jump,
            serialize: serialize::jump,
        },
        NodeKind::Task => KindCodec {
            parse: parse::other::parse_task,
            serialize: serialize::task,
        },
        NodeKind::Tip => KindCodec {
            parse: parse::other::parse_tip,
            serialize: serialize::tip,
        },
    }
}
