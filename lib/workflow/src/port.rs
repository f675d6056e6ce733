//! Output ports and port resolution.
//!
//! Every node has one implicit input port and the ordered output ports its
//! type declares. A condition node has one port per outcome ("yes"/"no"),
//! triggers and actions have a single "success" port.
//!
//! [`PortResolver`] is the only place that decides whether a port id is
//! valid for a node, so `InvalidPort` is raised from exactly one spot.

use crate::error::GraphError;
use crate::node::NodeInstance;
use crate::node_type::NodeCategory;
use crate::registry::NodeTypeRegistry;
use serde::{Deserialize, Serialize};

/// An output port declared by a node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPortDefinition {
    /// Port id, unique within the node type (e.g. "yes", "success").
    pub id: String,
    /// Display order on the node.
    pub order: u32,
}

impl OutputPortDefinition {
    /// Creates a new output port definition.
    #[must_use]
    pub fn new(id: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }
}

/// Resolves the output ports of node types against a registry.
#[derive(Debug, Clone, Copy)]
pub struct PortResolver<'a> {
    registry: &'a NodeTypeRegistry,
}

impl<'a> PortResolver<'a> {
    /// Creates a resolver backed by the registry.
    #[must_use]
    pub fn new(registry: &'a NodeTypeRegistry) -> Self {
        Self { registry }
    }

    /// Returns the ordered output ports of a node type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeType` if the type is not registered.
    pub fn output_ports(
        &self,
        category: NodeCategory,
        type_key: &str,
    ) -> Result<&'a [OutputPortDefinition], GraphError> {
        Ok(&self.registry.lookup(category, type_key)?.ports)
    }

    /// Returns the ordered output ports of a node's current type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeType` if the node's type is not registered.
    pub fn ports_of(&self, node: &NodeInstance) -> Result<&'a [OutputPortDefinition], GraphError> {
        self.output_ports(node.category, &node.type_key)
    }

    /// Checks that `port_id` is an output port of the node's type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPort` if the type does not define the port, or
    /// `UnknownNodeType` if the node's type is not registered.
    pub fn ensure_output_port(&self, node: &NodeInstance, port_id: &str) -> Result<(), GraphError> {
        if self.ports_of(node)?.iter().any(|p| p.id == port_id) {
            Ok(())
        } else {
            Err(GraphError::InvalidPort {
                node_id: node.id,
                port_id: port_id.to_string(),
            })
        }
    }
}
