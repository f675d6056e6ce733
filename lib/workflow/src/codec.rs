//! Flow definition encoding and decoding.
//!
//! A flow definition is the storage-ready form of a document:
//!
//! ```json
//! { "name": "...",
//!   "nodes": [{"id", "type", "category", "label", "config", "enabled", "position"?}],
//!   "edges": [{"id", "source", "sourcePort", "target"}] }
//! ```
//!
//! Both arrays are sorted by id and config keys are ordered, so two
//! encodings of equivalent documents are byte-identical. Decoding re-checks
//! everything against the registry and never returns a partial document.

use crate::binding::ConfigBinding;
use crate::editor::check_connection;
use crate::error::GraphError;
use crate::field::ConfigMap;
use crate::graph::FlowDocument;
use crate::node::{CanvasPosition, NodeInstance};
use crate::registry::NodeTypeRegistry;
use crate::settings::EditorSettings;
use flowdeck_core::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use tracing::instrument;

/// The persistence format of a flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub name: String,
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<EdgeEntry>,
}

/// A node in a flow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub type_key: String,
    pub category: String,
    pub label: String,
    pub config: ConfigMap,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<CanvasPosition>,
}

/// An edge in a flow definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEntry {
    pub id: String,
    pub source: String,
    pub source_port: String,
    pub target: String,
}

impl FlowDefinition {
    /// Serializes the definition as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; the definition types have no
    /// failing serialization paths of their own.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes the definition as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn to_json_value(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }
}

impl From<&NodeInstance> for NodeEntry {
    fn from(node: &NodeInstance) -> Self {
        Self {
            id: node.id.to_string(),
            type_key: node.type_key.clone(),
            category: node.category.to_string(),
            label: node.label.clone(),
            config: node.config.clone(),
            enabled: node.enabled,
            position: node.position,
        }
    }
}

/// Encodes a document, sorting nodes and edges by id.
#[must_use]
pub fn encode(document: &FlowDocument) -> FlowDefinition {
    let mut nodes: Vec<NodeEntry> = document.nodes().map(NodeEntry::from).collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let mut edges: Vec<EdgeEntry> = document
        .edges()
        .map(|edge| EdgeEntry {
            id: edge.id.to_string(),
            source: edge.source.to_string(),
            source_port: edge.source_port.clone(),
            target: edge.target.to_string(),
        })
        .collect();
    edges.sort_by(|a, b| a.id.cmp(&b.id));

    FlowDefinition {
        name: document.name().to_string(),
        nodes,
        edges,
    }
}

/// Decodes flow definition JSON text.
///
/// # Errors
///
/// Returns `MalformedFlowDefinition` for invalid JSON, otherwise the same
/// errors as [`decode_value`].
pub fn decode_str(
    registry: &NodeTypeRegistry,
    settings: &EditorSettings,
    text: &str,
) -> Result<FlowDocument, GraphError> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|e| GraphError::malformed(format!("invalid JSON: {e}")))?;
    decode_value(registry, settings, &value)
}

/// Decodes a flow definition into a document.
///
/// Node types are re-resolved against the registry, config is re-bound
/// through the node type's schema, and edges are checked exactly as
/// `connect` checks them.
///
/// # Errors
///
/// - `MalformedFlowDefinition` if `name`, `nodes`, or `edges` is missing or
///   of the wrong shape, an entry lacks a required field, an id does not
///   parse, or an id appears twice
/// - `UnknownNodeType` if a node's type is no longer registered
/// - `FieldTypeError` / `UnknownConfigField` if stored config fails binding
/// - `NodeNotFound`, `InvalidPort`, or `SelfLoop` for an invalid edge
#[instrument(level = "debug", skip_all)]
pub fn decode_value(
    registry: &NodeTypeRegistry,
    settings: &EditorSettings,
    value: &JsonValue,
) -> Result<FlowDocument, GraphError> {
    let object = value
        .as_object()
        .ok_or_else(|| GraphError::malformed("flow definition must be an object"))?;
    let name = object
        .get("name")
        .ok_or_else(|| GraphError::malformed("missing `name`"))?
        .as_str()
        .ok_or_else(|| GraphError::malformed("`name` must be a string"))?;
    let nodes = array_field(object, "nodes")?;
    let edges = array_field(object, "edges")?;

    let binding = ConfigBinding::new(settings.unknown_fields);
    let mut document = FlowDocument::new(name);

    for (index, raw) in nodes.iter().enumerate() {
        let entry = NodeEntry::deserialize(raw)
            .map_err(|e| GraphError::malformed(format!("node {index}: {e}")))?;
        let node_id: NodeId = parse_id(&entry.id, "node", index)?;
        let definition = registry.lookup_str(&entry.category, &entry.type_key)?;
        let validated = binding.validate(node_id, definition, &entry.config)?;

        let mut node = NodeInstance::new(node_id, definition, Some(entry.label));
        node.enabled = entry.enabled;
        node.position = entry.position;
        ConfigBinding::apply(&mut node, validated);
        document.insert_node(node)?;
    }

    for (index, raw) in edges.iter().enumerate() {
        let entry = EdgeEntry::deserialize(raw)
            .map_err(|e| GraphError::malformed(format!("edge {index}: {e}")))?;
        let edge_id: EdgeId = parse_id(&entry.id, "edge", index)?;
        let source: NodeId = parse_id(&entry.source, "edge", index)?;
        let target: NodeId = parse_id(&entry.target, "edge", index)?;

        let edge = check_connection(
            &document,
            registry,
            settings,
            edge_id,
            source,
            &entry.source_port,
            target,
        )?;
        document.insert_edge(edge)?;
    }

    tracing::debug!(
        nodes = document.node_count(),
        edges = document.edge_count(),
        "flow definition decoded"
    );
    Ok(document)
}

fn array_field<'a>(
    object: &'a serde_json::Map<String, JsonValue>,
    key: &str,
) -> Result<&'a Vec<JsonValue>, GraphError> {
    object
        .get(key)
        .ok_or_else(|| GraphError::malformed(format!("missing `{key}`")))?
        .as_array()
        .ok_or_else(|| GraphError::malformed(format!("`{key}` must be an array")))
}

fn parse_id<T>(text: &str, entry_kind: &str, index: usize) -> Result<T, GraphError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse()
        .map_err(|e| GraphError::malformed(format!("{entry_kind} {index}: {e}")))
}
