//! Parse, resolve and serialize interactive video story graphs.
//!
//! Story authors write node labels as plain text with a compact inline
//! tag language: square-bracket flags like `[start]` and `[loop]`,
//! guillemet conditions like `《gold>100》`, angle-bracket effects like
//! `<stamina -5>` and brace expressions like `{gold / 2}`. This crate
//! compiles that text into a structured story graph and back:
//!
//! - [`story::parse_interchange`] imports an authoring tool's export,
//!   classifying every entity, parsing its tags, resolving graph
//!   connectivity across skipped entities and inferring the variable
//!   catalog from usage.
//! - [`story::to_interchange`], [`story::to_story_data`] and
//!   [`story::to_visual_graph`] serialize the graph back out, emitting
//!   canonical tag text that reparses to the same records.
//!
//! All operations are pure data transformations: the crate never touches
//! files or media, only [`serde_json::Value`] documents and plain structs.

mod consts;

pub mod error;
pub mod format;
pub mod graph;
pub mod node;
pub mod story;
pub mod tag;
pub mod variable;

pub use error::DocumentError;
pub use format::ImportContext;
pub use node::{NodeData, NodeKind, Position, StoryNode};
pub use story::{
    load_story_data, load_visual_graph, parse_interchange, parse_node_text, text_for_node,
    to_interchange, to_story_data, to_visual_graph, ImportDiagnostics, StoryGraph,
};
pub use variable::{Persistence, Variable};
