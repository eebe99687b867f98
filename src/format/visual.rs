//! The visual-graph document: kind-tagged nodes and explicit edges.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::DocumentError,
    node::{NodeData, NodeKind, Position, StoryNode},
    variable::Variable,
};

/// A visual-graph document.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualDocument {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub variables: Vec<Variable>,
    pub start_node_id: Option<String>,
}

/// One node on the canvas. The kind-specific fields stay as raw JSON
/// until the kind is known.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: Value,
}

/// One directed edge between two nodes.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Validate the `nodes` array. A document without it is malformed and
/// aborts the load.
pub(crate) fn from_value(document: &Value) -> Result<VisualDocument, DocumentError> {
    let missing = crate::format::missing_array_fields(document, &["nodes"]);

    if !missing.is_empty() {
        return Err(DocumentError::from_fields(missing));
    }

    Ok(serde_json::from_value(document.clone())?)
}

impl VisualDocument {
    /// Turn the document into story nodes, wiring `next` from the edge
    /// list. A node whose `data` does not deserialize for its declared
    /// kind falls back to that kind's defaults.
    pub(crate) fn into_nodes(self) -> Vec<StoryNode> {
        let mut nodes: Vec<StoryNode> = self
            .nodes
            .into_iter()
            .map(|node| StoryNode {
                data: node_data(node.kind, node.data, &node.id),
                id: node.id,
                position: node.position,
                next: Vec::new(),
            })
            .collect();

        for edge in &self.edges {
            if let Some(node) = nodes.iter_mut().find(|node| node.id == edge.source) {
                if !node.next.contains(&edge.target) {
                    node.next.push(edge.target.clone());
                }
            }
        }

        nodes
    }

    /// Build the document from story nodes, synthesizing one edge per
    /// `next` entry.
    pub(crate) fn from_nodes(nodes: &[StoryNode]) -> Self {
        let mut edges = Vec::new();

        for node in nodes {
            for target in &node.next {
                edges.push(VisualEdge {
                    id: format!("{}-{}", node.id, target),
                    source: node.id.clone(),
                    target: target.clone(),
                    extra: serde_json::Map::new(),
                });
            }
        }

        VisualDocument {
            nodes: nodes
                .iter()
                .map(|node| VisualNode {
                    id: node.id.clone(),
                    kind: node.data.kind(),
                    position: node.position,
                    data: serde_json::to_value(DataView(&node.data))
                        .unwrap_or(Value::Null),
                })
                .collect(),
            edges,
            variables: Vec::new(),
            start_node_id: None,
        }
    }
}

/// Serialize just the kind record, without the enum tag.
struct DataView<'a>(&'a NodeData);

impl<'a> Serialize for DataView<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0 {
            NodeData::Video(data) => data.serialize(serializer),
            NodeData::Choice(data) => data.serialize(serializer),
            NodeData::Card(data) => data.serialize(serializer),
            NodeData::Bgm(data) => data.serialize(serializer),
            NodeData::Jump(data) => data.serialize(serializer),
            NodeData::Task(data) => data.serialize(serializer),
            NodeData::Tip(data) => data.serialize(serializer),
        }
    }
}

fn node_data(kind: NodeKind, data: Value, id: &str) -> NodeData {
    fn load<T: Default + serde::de::DeserializeOwned>(data: Value, id: &str) -> T {
        serde_json::from_value(data).unwrap_or_else(|err| {
            debug!("falling back to defaults for node '{}': {}", id, err);
            T::default()
        })
    }

    match kind {
        NodeKind::Video => NodeData::Video(load(data, id)),
        NodeKind::Choice => NodeData::Choice(load(data, id)),
        NodeKind::Card => NodeData::Card(load(data, id)),
        NodeKind::Bgm => NodeData::Bgm(load(data, id)),
        NodeKind::Jump => NodeData::Jump(load(data, id)),
        NodeKind::Task => NodeData::Task(load(data, id)),
        NodeKind::Tip => NodeData::Tip(load(data, id)),
    }
}
