//! The story graph and the document entry points.
//!
//! Everything here is a pure transformation between plain-data documents
//! and the structured graph: no file access, no media access, no global
//! state. Importing runs the full pipeline (classify, parse, resolve
//! connectivity, infer variables); exporting runs the serializers in
//! reverse and emits canonical tag text.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::{
    consts::{DRAFT_MARKER, IGNORE_MARKER, IMAGE_KIND, SECTION_KIND, TOPIC_KIND},
    error::DocumentError,
    format::{
        interchange, story_data, visual, EntityEnvelope, ImportContext, InterchangeAssociation,
        InterchangeCarryover, InterchangeDocument, InterchangeEntity, StoryDataDocument,
        VisualDocument,
    },
    graph::{resolve_next, Association},
    node::{classify, codec, Position, StoryNode},
    variable::{merge_variables, Variable, VariableInference},
};

/// The structured story model every document shape converts to and from.
#[derive(Clone, Debug, Default)]
pub struct StoryGraph {
    pub nodes: Vec<StoryNode>,
    /// The merged variable catalog: explicit entries, display hints applied.
    pub variables: Vec<Variable>,
    /// Inferred variables absent from the explicit catalog. Kept separate
    /// for review, never exported.
    pub supplemental_variables: Vec<Variable>,
    pub start_node_id: Option<String>,
    /// Story-data document version, carried verbatim from load.
    pub version: Option<String>,
    /// Interchange content with no model counterpart, written back on export.
    pub carryover: InterchangeCarryover,
    pub diagnostics: ImportDiagnostics,
}

/// Counters describing what an import dropped or cut. Informational only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportDiagnostics {
    /// Entities excluded from the graph: unsupported kinds, sentinel tags
    /// and entities inside an excluded section.
    pub skipped_entities: usize,
    /// Bypass chains cut by the connectivity resolver's cycle guard.
    pub cycles_bypassed: usize,
}

impl StoryGraph {
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Parse one entity's label text into a structured node.
///
/// The node's kind is decided here, once, from the text and the hint; the
/// graph fields (id, position, successors) are left at their defaults for
/// the caller to fill in.
pub fn parse_node_text(text: &str, kind_hint: &str) -> StoryNode {
    let kind = classify(text, kind_hint);

    StoryNode {
        id: String::new(),
        position: Position::default(),
        next: Vec::new(),
        data: (codec(kind).parse)(text),
    }
}

/// Serialize a node back to canonical tag text.
///
/// Inverse of [`parse_node_text`]: parsing the returned text with the
/// node's kind reproduces the same record.
pub fn text_for_node(node: &StoryNode) -> String {
    (codec(node.data.kind()).serialize)(&node.data).unwrap_or_default()
}

/// Import an interchange document into a story graph.
///
/// The shape check runs first: a malformed document returns an error
/// before any graph state is built, so a failed import leaves whatever
/// the caller held before untouched.
pub fn parse_interchange(
    document: &Value,
    context: &ImportContext,
) -> Result<StoryGraph, DocumentError> {
    let document = interchange::from_value(document)?;

    let skip = skip_entities(&document.entities);

    let associations: Vec<Association> = document
        .associations
        .iter()
        .map(|association| Association {
            source: association.source.clone(),
            target: association.target.clone(),
        })
        .collect();

    let resolution = resolve_next(&associations, &skip);

    let mut carryover = InterchangeCarryover {
        version: document.version.clone(),
        ..InterchangeCarryover::default()
    };

    for association in &document.associations {
        if !association.extra.is_empty() {
            carryover.associations.insert(
                (association.source.clone(), association.target.clone()),
                association.extra.clone(),
            );
        }
    }

    let mut inference = VariableInference::new();
    let mut nodes = Vec::new();

    for entity in &document.entities {
        if skip.contains(&entity.uuid) {
            continue;
        }

        let mut node = parse_node_text(&entity.text, &entity.kind);
        node.id = entity.uuid.clone();
        node.position = context.to_position(entity.location);
        node.next = resolution.next_of(&entity.uuid);

        carryover
            .entities
            .insert(entity.uuid.clone(), EntityEnvelope::of(entity));

        inference.harvest_node(&node);
        inference.harvest_text(&entity.text);

        nodes.push(node);
    }

    let explicit = document.variables.unwrap_or_default();
    let (variables, supplemental_variables) = merge_variables(&explicit, inference.finish());

    let skipped_entities = skip.len();

    if skipped_entities > 0 {
        debug!(skipped_entities, "entities excluded from the story graph");
    }

    let start_node_id = detect_start(&nodes, None);

    Ok(StoryGraph {
        nodes,
        variables,
        supplemental_variables,
        start_node_id,
        version: None,
        carryover,
        diagnostics: ImportDiagnostics {
            skipped_entities,
            cycles_bypassed: resolution.cycles_bypassed,
        },
    })
}

/// Export a story graph to an interchange document.
///
/// One entity is written per node with canonical tag text and one
/// association per resolved successor. The carryover restores each
/// entity's envelope (declared kind, size, color, unknown fields) and the
/// document version; a node the graph created itself exports as a plain
/// `topic`. Only the merged catalog is exported, never the supplemental
/// list.
pub fn to_interchange(graph: &StoryGraph, context: &ImportContext) -> InterchangeDocument {
    let mut associations = Vec::new();

    for node in &graph.nodes {
        for target in &node.next {
            associations.push(InterchangeAssociation {
                source: node.id.clone(),
                target: target.clone(),
                extra: graph
                    .carryover
                    .associations
                    .get(&(node.id.clone(), target.clone()))
                    .cloned()
                    .unwrap_or_default(),
            });
        }
    }

    InterchangeDocument {
        version: graph.carryover.version.clone(),
        entities: graph
            .nodes
            .iter()
            .map(|node| {
                let envelope = graph.carryover.entities.get(&node.id);

                InterchangeEntity {
                    uuid: node.id.clone(),
                    text: text_for_node(node),
                    location: context.to_location(node.position),
                    kind: envelope
                        .map(|envelope| envelope.kind.clone())
                        .filter(|kind| !kind.is_empty())
                        .unwrap_or_else(|| TOPIC_KIND.to_string()),
                    size: envelope.and_then(|envelope| envelope.size),
                    color: envelope.and_then(|envelope| envelope.color.clone()),
                    extra: envelope
                        .map(|envelope| envelope.extra.clone())
                        .unwrap_or_default(),
                }
            })
            .collect(),
        associations,
        variables: if graph.variables.is_empty() {
            None
        } else {
            Some(graph.variables.clone())
        },
    }
}

/// Load a story-data document.
///
/// The document is already structured, so no text parsing or variable
/// inference runs; the seven arrays are flattened in array order.
pub fn load_story_data(document: &Value) -> Result<StoryGraph, DocumentError> {
    let document = story_data::from_value(document)?;

    let variables = document.variables.clone();
    let declared_start = document.start_node_id.clone();
    let version = document.version.clone();
    let nodes = document.into_nodes();
    let start_node_id = detect_start(&nodes, declared_start);

    Ok(StoryGraph {
        nodes,
        variables,
        supplemental_variables: Vec::new(),
        start_node_id,
        version,
        carryover: InterchangeCarryover::default(),
        diagnostics: ImportDiagnostics::default(),
    })
}

/// Export a story graph to a story-data document.
///
/// A loaded version is written back verbatim; a graph that never had one
/// is stamped `"1.0"`.
pub fn to_story_data(graph: &StoryGraph) -> StoryDataDocument {
    let mut document = StoryDataDocument::from_nodes(&graph.nodes);

    document.variables = graph.variables.clone();
    document.start_node_id = graph.start_node_id.clone();
    document.version = graph
        .version
        .clone()
        .or_else(|| Some("1.0".to_string()));

    document
}

/// Load a visual-graph document.
pub fn load_visual_graph(document: &Value) -> Result<StoryGraph, DocumentError> {
    let document = visual::from_value(document)?;

    let variables = document.variables.clone();
    let declared_start = document.start_node_id.clone();
    let nodes = document.into_nodes();
    let start_node_id = detect_start(&nodes, declared_start);

    Ok(StoryGraph {
        nodes,
        variables,
        supplemental_variables: Vec::new(),
        start_node_id,
        version: None,
        carryover: InterchangeCarryover::default(),
        diagnostics: ImportDiagnostics::default(),
    })
}

/// Export a story graph to a visual-graph document.
pub fn to_visual_graph(graph: &StoryGraph) -> VisualDocument {
    let mut document = VisualDocument::from_nodes(&graph.nodes);

    document.variables = graph.variables.clone();
    document.start_node_id = graph.start_node_id.clone();

    document
}

/// Pick the start node: the first node carrying the start flag, else the
/// document's declared start if it names a present node, else the first
/// node.
fn detect_start(nodes: &[StoryNode], declared: Option<String>) -> Option<String> {
    if let Some(node) = nodes.iter().find(|node| node.data.is_start()) {
        return Some(node.id.clone());
    }

    if let Some(declared) = declared {
        if nodes.iter().any(|node| node.id == declared) {
            return Some(declared);
        }
    }

    nodes.first().map(|node| node.id.clone())
}

/// Decide which entities stay out of the story graph.
///
/// Skipped: entities of unsupported kinds (everything but topics and
/// images, sections included), entities whose text carries the ignore
/// sentinel, and entities lying inside a draft-tagged section.
fn skip_entities(entities: &[InterchangeEntity]) -> HashSet<String> {
    let draft_sections: Vec<&InterchangeEntity> = entities
        .iter()
        .filter(|entity| entity.kind == SECTION_KIND && entity.text.contains(DRAFT_MARKER))
        .collect();

    entities
        .iter()
        .filter(|entity| {
            if entity.kind != TOPIC_KIND && entity.kind != IMAGE_KIND {
                return true;
            }

            if entity.text.contains(IGNORE_MARKER) {
                return true;
            }

            draft_sections.iter().any(|section| entity.inside(section))
        })
        .map(|entity| entity.uuid.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;
    use serde_json::json;

    fn entity(uuid: &str, text: &str, kind: &str, location: [f64; 2]) -> Value {
        json!({ "uuid": uuid, "text": text, "kind": kind, "location": location })
    }

    #[test]
    fn parsed_node_text_round_trips_through_the_serializer() {
        let node = parse_node_text("[option] [start] 《AD30》 Open the gate", "topic");
        let text = text_for_node(&node);

        assert_eq!(parse_node_text(&text, "topic"), node);
    }

    #[test]
    fn image_entities_become_video_nodes() {
        let document = json!({
            "entities": [entity("a", "Forest shot", IMAGE_KIND, [0.0, 0.0])],
            "associations": []
        });

        let graph = parse_interchange(&document, &ImportContext::default()).unwrap();

        match &graph.nodes[0].data {
            NodeData::Video(video) => assert_eq!(&video.name, "Forest shot"),
            other => panic!("expected a video node but got {:?}", other),
        }
    }

    #[test]
    fn ignored_and_unsupported_entities_are_skipped_and_bypassed() {
        let document = json!({
            "entities": [
                entity("a", "Opening", "topic", [0.0, 0.0]),
                entity("b", "[ignore] scratch note", "topic", [0.0, 10.0]),
                entity("c", "Ending", "topic", [0.0, 20.0]),
                entity("d", "a loose label", "label", [0.0, 30.0]),
            ],
            "associations": [
                { "source": "a", "target": "b" },
                { "source": "b", "target": "c" },
            ]
        });

        let graph = parse_interchange(&document, &ImportContext::default()).unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.node("a").unwrap().next, vec!["c"]);
        assert_eq!(graph.diagnostics.skipped_entities, 2);
    }

    #[test]
    fn entities_inside_a_draft_section_are_skipped() {
        let document = json!({
            "entities": [
                {
                    "uuid": "s", "text": "[draft] work in progress",
                    "kind": SECTION_KIND, "location": [0.0, 0.0],
                    "size": [100.0, 100.0]
                },
                entity("a", "Unfinished", "topic", [10.0, 10.0]),
                entity("b", "Published", "topic", [10.0, 500.0]),
            ],
            "associations": []
        });

        let graph = parse_interchange(&document, &ImportContext::default()).unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(&graph.nodes[0].id, "b");
    }

    #[test]
    fn the_start_node_is_the_first_with_the_start_flag() {
        let document = json!({
            "entities": [
                entity("a", "Opening", "topic", [0.0, 0.0]),
                entity("b", "[start] True beginning", "topic", [0.0, 10.0]),
            ],
            "associations": []
        });

        let graph = parse_interchange(&document, &ImportContext::default()).unwrap();

        assert_eq!(graph.start_node_id.as_deref(), Some("b"));
    }

    #[test]
    fn without_a_start_flag_the_first_node_is_the_start() {
        let document = json!({
            "entities": [
                entity("a", "Opening", "topic", [0.0, 0.0]),
                entity("b", "Next", "topic", [0.0, 10.0]),
            ],
            "associations": []
        });

        let graph = parse_interchange(&document, &ImportContext::default()).unwrap();

        assert_eq!(graph.start_node_id.as_deref(), Some("a"));
    }

    #[test]
    fn inferred_variables_missing_from_the_catalog_are_supplemental() {
        let document = json!({
            "entities": [
                entity("a", "《gold>100》<stamina -5> Shortcut", "topic", [0.0, 0.0]),
            ],
            "associations": [],
            "variables": [{ "name": "gold" }]
        });

        let graph = parse_interchange(&document, &ImportContext::default()).unwrap();

        assert_eq!(graph.variables.len(), 1);
        assert_eq!(graph.supplemental_variables.len(), 1);
        assert_eq!(&graph.supplemental_variables[0].name, "stamina");
    }

    #[test]
    fn exported_interchange_documents_reimport_to_the_same_graph() {
        let document = json!({
            "entities": [
                entity("a", "[start] Opening", "topic", [0.0, 0.0]),
                entity("b", "[option] Take the shortcut 《50%》", "topic", [10.0, 20.0]),
            ],
            "associations": [{ "source": "a", "target": "b" }]
        });

        let context = ImportContext::default();
        let graph = parse_interchange(&document, &context).unwrap();

        let exported = serde_json::to_value(to_interchange(&graph, &context)).unwrap();
        let reimported = parse_interchange(&exported, &context).unwrap();

        assert_eq!(reimported.nodes, graph.nodes);
        assert_eq!(reimported.start_node_id, graph.start_node_id);
    }

    #[test]
    fn entity_envelopes_and_document_version_are_written_back_on_export() {
        let document = json!({
            "version": 4,
            "entities": [
                {
                    "uuid": "a", "text": "Rain on the window", "kind": "image",
                    "location": [1.0, 2.0], "size": [9.0, 16.0],
                    "color": "#222222", "styleId": 7
                },
                entity("b", "Next", "topic", [0.0, 30.0]),
            ],
            "associations": [{ "source": "a", "target": "b", "curve": "bezier" }]
        });

        let context = ImportContext::default();
        let graph = parse_interchange(&document, &context).unwrap();
        let exported = serde_json::to_value(to_interchange(&graph, &context)).unwrap();

        assert_eq!(exported["version"], 4);

        let exported_entity = &exported["entities"][0];
        assert_eq!(exported_entity["kind"], "image");
        assert_eq!(exported_entity["size"], json!([9.0, 16.0]));
        assert_eq!(exported_entity["color"], "#222222");
        assert_eq!(exported_entity["styleId"], 7);

        assert_eq!(exported["associations"][0]["curve"], "bezier");
    }

    #[test]
    fn a_loaded_story_data_version_is_written_back_verbatim() {
        let graph = load_story_data(&json!({
            "videoNodes": [{ "nodeId": "a", "name": "Intro" }],
            "version": "2.3"
        }))
        .unwrap();

        assert_eq!(to_story_data(&graph).version.as_deref(), Some("2.3"));
    }

    #[test]
    fn story_data_export_stamps_a_version() {
        let graph = load_story_data(&json!({
            "videoNodes": [{ "nodeId": "a", "name": "Intro", "isStart": true }]
        }))
        .unwrap();

        let document = to_story_data(&graph);

        assert_eq!(document.version.as_deref(), Some("1.0"));
        assert_eq!(document.start_node_id.as_deref(), Some("a"));
    }

    #[test]
    fn a_failed_load_reports_every_missing_array() {
        let result = load_story_data(&json!({ "variables": [] }));

        match result {
            Err(DocumentError::Malformed { fields }) => assert_eq!(fields.len(), 7),
            other => panic!("expected a malformed document error but got {:?}", other),
        }
    }

    #[test]
    fn visual_graphs_round_trip_through_the_story_graph() {
        let graph = load_visual_graph(&json!({
            "nodes": [
                { "id": "a", "kind": "video", "data": { "name": "Intro", "isStart": true } },
                { "id": "b", "kind": "tip", "data": { "body": "Hold to skip" } }
            ],
            "edges": [{ "id": "e1", "source": "a", "target": "b" }]
        }))
        .unwrap();

        let exported = serde_json::to_value(to_visual_graph(&graph)).unwrap();
        let reloaded = load_visual_graph(&exported).unwrap();

        assert_eq!(reloaded.nodes, graph.nodes);
        assert_eq!(reloaded.start_node_id.as_deref(), Some("a"));
        assert_eq!(exported["nodes"][0]["kind"], "video");
    }
}
