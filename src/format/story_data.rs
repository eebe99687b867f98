//! The story-data document: seven typed node arrays plus the catalog.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::DocumentError,
    node::{
        BgmNode, CardNode, ChoiceNode, JumpNode, NodeData, Position, StoryNode, TaskNode, TipNode,
        VideoNode,
    },
    variable::Variable,
};

/// The seven node-array field names, used for the malformed-document check.
pub(crate) const NODE_ARRAY_FIELDS: [&str; 7] = [
    "videoNodes",
    "choiceNodes",
    "bgmNodes",
    "cardNodes",
    "jumpNodes",
    "taskNodes",
    "tipNodes",
];

/// A story-data document.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryDataDocument {
    pub video_nodes: Vec<NodeRecord<VideoNode>>,
    pub choice_nodes: Vec<NodeRecord<ChoiceNode>>,
    pub bgm_nodes: Vec<NodeRecord<BgmNode>>,
    pub card_nodes: Vec<NodeRecord<CardNode>>,
    pub jump_nodes: Vec<NodeRecord<JumpNode>>,
    pub task_nodes: Vec<NodeRecord<TaskNode>>,
    pub tip_nodes: Vec<NodeRecord<TipNode>>,
    pub variables: Vec<Variable>,
    pub start_node_id: Option<String>,
    pub version: Option<String>,
}

/// One node record: the shared envelope flattened with its kind's fields.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord<T> {
    pub node_id: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub next_node_ids: Vec<String>,
    #[serde(flatten)]
    pub data: T,
}

/// Validate the seven node arrays.
///
/// A document missing every one of them is malformed and aborts the load;
/// a document with at least one present array is loaded best-effort.
pub(crate) fn from_value(document: &Value) -> Result<StoryDataDocument, DocumentError> {
    let missing = crate::format::missing_array_fields(document, &NODE_ARRAY_FIELDS);

    if missing.len() == NODE_ARRAY_FIELDS.len() {
        return Err(DocumentError::from_fields(missing));
    }

    Ok(serde_json::from_value(document.clone())?)
}

impl StoryDataDocument {
    /// Flatten the seven arrays into story nodes, in array order.
    pub(crate) fn into_nodes(self) -> Vec<StoryNode> {
        let mut nodes = Vec::new();

        collect(&mut nodes, self.video_nodes, NodeData::Video);
        collect(&mut nodes, self.choice_nodes, NodeData::Choice);
        collect(&mut nodes, self.bgm_nodes, NodeData::Bgm);
        collect(&mut nodes, self.card_nodes, NodeData::Card);
        collect(&mut nodes, self.jump_nodes, NodeData::Jump);
        collect(&mut nodes, self.task_nodes, NodeData::Task);
        collect(&mut nodes, self.tip_nodes, NodeData::Tip);

        nodes
    }

    /// Partition story nodes back into the seven arrays.
    pub(crate) fn from_nodes(nodes: &[StoryNode]) -> Self {
        let mut document = StoryDataDocument::default();

        for node in nodes {
            match &node.data {
                NodeData::Video(data) => document.video_nodes.push(record(node, data.clone())),
                NodeData::Choice(data) => document.choice_nodes.push(record(node, data.clone())),
                NodeData::Bgm(data) => document.bgm_nodes.push(record(node, data.clone())),
                NodeData::Card(data) => document.card_nodes.push(record(node, data.clone())),
                NodeData::Jump(data) => document.jump_nodes.push(record(node, data.clone())),
                NodeData::Task(data) => document.task_nodes.push(record(node, data.clone())),
                NodeData::Tip(data) => document.tip_nodes.push(record(node, data.clone())),
            }
        }

        document
    }
}

fn collect<T, F>(nodes: &mut Vec<StoryNode>, records: Vec<NodeRecord<T>>, wrap: F)
where
    F: Fn(T) -> NodeData,
{
    for record in records {
        nodes.push(StoryNode {
            id: record.node_id,
            position: record.position,
            next: record.next_node_ids,
            data: wrap(record.data),
        });
    }
}

fn record<T: Clone>(node: &StoryNode, data: T) -> NodeRecord<T> {
    NodeRecord {
        node_id: node.id.clone(),
        position: node.position,
        next_node_ids: node.next.clone(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn a_document_missing_all_seven_arrays_is_malformed() {
        let document = json!({ "variables": [] });

        match from_value(&document) {
            Err(DocumentError::Malformed { fields }) => {
                assert_eq!(fields.len(), 7);
            }
            other => panic!("expected a malformed document error but got {:?}", other),
        }
    }

    #[test]
    fn a_document_with_one_array_present_loads() {
        let document = json!({
            "videoNodes": [{ "nodeId": "a", "name": "Intro" }]
        });

        let parsed = from_value(&document).unwrap();
        let nodes = parsed.into_nodes();

        assert_eq!(nodes.len(), 1);
        assert_eq!(&nodes[0].id, "a");

        match &nodes[0].data {
            NodeData::Video(video) => assert_eq!(&video.name, "Intro"),
            other => panic!("expected a video node but got {:?}", other),
        }
    }

    #[test]
    fn node_records_flatten_their_kind_fields() {
        let node = StoryNode {
            id: "a".to_string(),
            position: Position { x: 1.0, y: 2.0 },
            next: vec!["b".to_string()],
            data: NodeData::Task(TaskNode {
                name: "Shells".to_string(),
                max_count: 3,
            }),
        };

        let document = StoryDataDocument::from_nodes(&[node]);
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["taskNodes"][0]["nodeId"], "a");
        assert_eq!(value["taskNodes"][0]["maxCount"], 3);
        assert_eq!(value["taskNodes"][0]["nextNodeIds"][0], "b");
    }
}
