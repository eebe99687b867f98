//! The interchange document: the external authoring tool's export shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::DocumentError, format::missing_array_fields, variable::Variable};

/// An interchange document: raw entities, directed associations and an
/// optional explicit variable catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InterchangeDocument {
    pub version: Option<Value>,
    pub entities: Vec<InterchangeEntity>,
    pub associations: Vec<InterchangeAssociation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<Variable>>,
}

/// A raw entity as loaded from an interchange document. Immutable input
/// to parsing.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InterchangeEntity {
    pub uuid: String,
    pub text: String,
    /// Stored `[y, x]` by the authoring tool.
    pub location: [f64; 2],
    pub kind: String,
    /// Stored `[height, width]`, the same y-first order as `location`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fields this crate does not interpret, carried for lossless export.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InterchangeAssociation {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Document content with no counterpart in the structured model, carried
/// from import so that export writes it back instead of dropping it.
#[derive(Clone, Debug, Default)]
pub struct InterchangeCarryover {
    /// The document's version field, whatever JSON it held.
    pub version: Option<Value>,
    /// Per-entity envelope, keyed by uuid.
    pub entities: HashMap<String, EntityEnvelope>,
    /// Uninterpreted association fields, keyed by (source, target).
    pub associations: HashMap<(String, String), serde_json::Map<String, Value>>,
}

/// The envelope of one entity: everything around its text that the
/// structured model does not interpret.
#[derive(Clone, Debug, Default)]
pub struct EntityEnvelope {
    pub kind: String,
    pub size: Option<[f64; 2]>,
    pub color: Option<String>,
    pub extra: serde_json::Map<String, Value>,
}

impl EntityEnvelope {
    pub(crate) fn of(entity: &InterchangeEntity) -> Self {
        EntityEnvelope {
            kind: entity.kind.clone(),
            size: entity.size,
            color: entity.color.clone(),
            extra: entity.extra.clone(),
        }
    }
}

/// Validate and deserialize an interchange document.
///
/// The shape check runs before any graph construction: a missing or
/// non-array `entities` field aborts the import wholesale.
pub(crate) fn from_value(document: &Value) -> Result<InterchangeDocument, DocumentError> {
    let missing = missing_array_fields(document, &["entities"]);

    if !missing.is_empty() {
        return Err(DocumentError::from_fields(missing));
    }

    Ok(serde_json::from_value(document.clone())?)
}

impl InterchangeEntity {
    /// Whether the entity lies inside the rectangle of `section`.
    ///
    /// Sections carry their size; an entity belongs to a section when its
    /// own location point falls within those bounds.
    pub(crate) fn inside(&self, section: &InterchangeEntity) -> bool {
        let size = match section.size {
            Some(size) => size,
            None => return false,
        };

        let [y, x] = self.location;
        let [section_y, section_x] = section.location;
        let [height, width] = size;

        x >= section_x && x <= section_x + width && y >= section_y && y <= section_y + height
    }
}
