//! The mutation engine for interactive editing.
//!
//! [`FlowEditor`] owns one [`FlowDocument`] for the duration of an editing
//! session. Every operation runs synchronously and is all-or-nothing: it
//! validates first and only then mutates, so a returned error means the
//! document is exactly as it was before the call.

use crate::binding::ConfigBinding;
use crate::codec::{self, FlowDefinition};
use crate::edge::EdgeInstance;
use crate::error::GraphError;
use crate::field::ConfigMap;
use crate::graph::FlowDocument;
use crate::node::{CanvasPosition, NodeInstance};
use crate::node_type::NodeCategory;
use crate::port::PortResolver;
use crate::registry::NodeTypeRegistry;
use crate::settings::EditorSettings;
use flowdeck_core::{EdgeId, NodeId};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::debug;

/// Edits a flow document against a node type registry.
#[derive(Debug, Clone)]
pub struct FlowEditor {
    registry: Arc<NodeTypeRegistry>,
    settings: EditorSettings,
    document: FlowDocument,
}

impl FlowEditor {
    /// Creates an editor over a new, empty document.
    #[must_use]
    pub fn new(registry: Arc<NodeTypeRegistry>, name: impl Into<String>) -> Self {
        Self::with_settings(registry, EditorSettings::default(), FlowDocument::new(name))
    }

    /// Creates an editor over an existing document.
    #[must_use]
    pub fn with_settings(
        registry: Arc<NodeTypeRegistry>,
        settings: EditorSettings,
        document: FlowDocument,
    ) -> Self {
        Self {
            registry,
            settings,
            document,
        }
    }

    /// Decodes a flow definition and opens it for editing.
    ///
    /// # Errors
    ///
    /// Returns the decode failure; no editor is created.
    pub fn decode(
        registry: Arc<NodeTypeRegistry>,
        settings: EditorSettings,
        definition: &JsonValue,
    ) -> Result<Self, GraphError> {
        let document = codec::decode_value(&registry, &settings, definition)?;
        Ok(Self::with_settings(registry, settings, document))
    }

    /// Returns the document being edited.
    #[must_use]
    pub fn document(&self) -> &FlowDocument {
        &self.document
    }

    /// Consumes the editor and returns its document.
    #[must_use]
    pub fn into_document(self) -> FlowDocument {
        self.document
    }

    /// Replaces the document wholesale, e.g. after a reload.
    pub fn replace_document(&mut self, document: FlowDocument) -> FlowDocument {
        std::mem::replace(&mut self.document, document)
    }

    /// Returns the registry used to resolve node types.
    #[must_use]
    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    /// Returns the editor settings.
    #[must_use]
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Encodes the document as a flow definition.
    #[must_use]
    pub fn encode(&self) -> FlowDefinition {
        codec::encode(&self.document)
    }

    fn binding(&self) -> ConfigBinding {
        ConfigBinding::new(self.settings.unknown_fields)
    }

    fn existing_node(&self, node_id: NodeId) -> Result<&NodeInstance, GraphError> {
        self.document
            .node(node_id)
            .ok_or(GraphError::NodeNotFound { node_id })
    }

    fn existing_node_mut(&mut self, node_id: NodeId) -> Result<&mut NodeInstance, GraphError> {
        self.document
            .node_mut(node_id)
            .ok_or(GraphError::NodeNotFound { node_id })
    }

    /// Adds an unconnected node of the given type.
    ///
    /// The node gets a fresh ID, an empty config, and is enabled. Without a
    /// label it takes the type's default label.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeType` if the type is not registered.
    pub fn add_node(
        &mut self,
        category: NodeCategory,
        type_key: &str,
        label: Option<String>,
    ) -> Result<&NodeInstance, GraphError> {
        let definition = self.registry.lookup(category, type_key)?;
        let node = NodeInstance::new(self.document.allocate_node_id(), definition, label);
        let node_id = node.id;
        self.document.insert_node(node)?;
        debug!(node_id = %node_id, %category, type_key, "node added");
        self.existing_node(node_id)
    }

    /// Deletes a node and every edge that touches it.
    ///
    /// Returns the IDs of the edges removed with the node.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is absent.
    pub fn delete_node(&mut self, node_id: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        let (_, edges) = self
            .document
            .remove_node(node_id)
            .ok_or(GraphError::NodeNotFound { node_id })?;
        let edge_ids: Vec<EdgeId> = edges.iter().map(|e| e.id).collect();
        debug!(node_id = %node_id, removed_edges = edge_ids.len(), "node deleted");
        Ok(edge_ids)
    }

    /// Copies a node's type, config, and enabled state under a fresh ID.
    ///
    /// Edges are not copied. The copy's label gets the configured suffix
    /// and it is left unplaced for the canvas to position.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is absent.
    pub fn duplicate_node(&mut self, node_id: NodeId) -> Result<&NodeInstance, GraphError> {
        let original = self.existing_node(node_id)?;
        let copy = NodeInstance {
            id: self.document.allocate_node_id(),
            type_key: original.type_key.clone(),
            category: original.category,
            label: format!("{}{}", original.label, self.settings.copy_label_suffix),
            config: original.config.clone(),
            enabled: original.enabled,
            position: None,
        };
        let copy_id = copy.id;
        self.document.insert_node(copy)?;
        debug!(node_id = %node_id, copy_id = %copy_id, "node duplicated");
        self.existing_node(copy_id)
    }

    /// Connects a source node's output port to a target node.
    ///
    /// Fan-out from one port and fan-in to one node are both allowed.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if either node is absent, `InvalidPort` if the
    /// source type has no such output port, or `SelfLoop` if source and
    /// target are the same node and self-loops are not allowed.
    pub fn connect(
        &mut self,
        source: NodeId,
        source_port: &str,
        target: NodeId,
    ) -> Result<&EdgeInstance, GraphError> {
        let edge = self.check_connection(source, source_port, target)?;
        let edge_id = edge.id;
        self.document.insert_edge(edge)?;
        debug!(edge_id = %edge_id, source = %source, source_port, target = %target, "nodes connected");
        self.document
            .edge(edge_id)
            .ok_or(GraphError::EdgeNotFound { edge_id })
    }

    /// Builds the edge `connect` would add, without adding it.
    fn check_connection(
        &self,
        source: NodeId,
        source_port: &str,
        target: NodeId,
    ) -> Result<EdgeInstance, GraphError> {
        check_connection(
            &self.document,
            &self.registry,
            &self.settings,
            self.document.allocate_edge_id(),
            source,
            source_port,
            target,
        )
    }

    /// Removes an edge.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` if the edge is absent.
    pub fn disconnect(&mut self, edge_id: EdgeId) -> Result<EdgeInstance, GraphError> {
        let edge = self
            .document
            .remove_edge(edge_id)
            .ok_or(GraphError::EdgeNotFound { edge_id })?;
        debug!(edge_id = %edge_id, "edge removed");
        Ok(edge)
    }

    /// Validates a config payload and merges it into the node's config.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is absent, `FieldTypeError` if a
    /// value has the wrong kind, or `UnknownConfigField` under the reject
    /// policy. Nothing is written on failure.
    pub fn set_node_config(&mut self, node_id: NodeId, payload: &ConfigMap) -> Result<&NodeInstance, GraphError> {
        let node = self.existing_node(node_id)?;
        let definition = self.registry.lookup(node.category, &node.type_key)?;
        let validated = self.binding().validate(node_id, definition, payload)?;

        let node = self.existing_node_mut(node_id)?;
        ConfigBinding::apply(node, validated);
        debug!(node_id = %node_id, fields = payload.len(), "node config updated");
        self.existing_node(node_id)
    }

    /// Changes a node's label.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is absent.
    pub fn rename_node(&mut self, node_id: NodeId, label: impl Into<String>) -> Result<(), GraphError> {
        self.existing_node_mut(node_id)?.label = label.into();
        debug!(node_id = %node_id, "node renamed");
        Ok(())
    }

    /// Enables or disables a node.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is absent.
    pub fn set_enabled(&mut self, node_id: NodeId, enabled: bool) -> Result<(), GraphError> {
        self.existing_node_mut(node_id)?.enabled = enabled;
        debug!(node_id = %node_id, enabled, "node enabled flag set");
        Ok(())
    }

    /// Records where the canvas placed a node.
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if the node is absent, or `InvalidPosition`
    /// if a coordinate is NaN or infinite.
    pub fn set_position(&mut self, node_id: NodeId, position: Option<CanvasPosition>) -> Result<(), GraphError> {
        let node = self.existing_node_mut(node_id)?;
        if position.is_some_and(|p| !p.is_finite()) {
            return Err(GraphError::InvalidPosition { node_id });
        }
        node.position = position;
        debug!(node_id = %node_id, placed = position.is_some(), "node position set");
        Ok(())
    }

    /// Renames the flow itself.
    pub fn rename_flow(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(name = %name, "flow renamed");
        self.document.set_name(name);
    }
}

/// Checks a connection the way `connect` does and returns the edge to add.
///
/// Shared with the decoder so stored edges are held to the same rules.
pub(crate) fn check_connection(
    document: &FlowDocument,
    registry: &NodeTypeRegistry,
    settings: &EditorSettings,
    edge_id: EdgeId,
    source: NodeId,
    source_port: &str,
    target: NodeId,
) -> Result<EdgeInstance, GraphError> {
    let source_node = document
        .node(source)
        .ok_or(GraphError::NodeNotFound { node_id: source })?;
    if !document.contains_node(target) {
        return Err(GraphError::NodeNotFound { node_id: target });
    }
    PortResolver::new(registry).ensure_output_port(source_node, source_port)?;
    if source == target && !settings.allow_self_loops {
        return Err(GraphError::SelfLoop { node_id: source });
    }
    Ok(EdgeInstance::new(edge_id, source, source_port, target))
}
