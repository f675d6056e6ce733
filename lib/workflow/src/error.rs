//! Error types for the workflow crate.
//!
//! Errors carry identifying fields only; presenting them to a person is the
//! caller's job. Outer layers wrap them in rootcause reports:
//! - `GraphError`: Editing, binding, and flow definition failures
//! - `RegistryError`: Catalog construction failures at process start

use crate::field::FieldKind;
use crate::node_type::NodeCategory;
use flowdeck_core::{EdgeId, NodeId};
use std::fmt;

/// Errors from graph operations.
///
/// Every mutating operation is all-or-nothing: when one of these is returned
/// the document is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No node type is registered under the category and type key.
    UnknownNodeType { category: String, type_key: String },
    /// Node with the given ID was not found in the document.
    NodeNotFound { node_id: NodeId },
    /// Edge with the given ID was not found in the document.
    EdgeNotFound { edge_id: EdgeId },
    /// The port is not an output port of the node's type.
    InvalidPort { node_id: NodeId, port_id: String },
    /// An edge would connect a node to itself.
    SelfLoop { node_id: NodeId },
    /// A config value does not match the field's declared kind.
    FieldTypeError {
        node_id: NodeId,
        field: String,
        expected: FieldKind,
    },
    /// A config key the node type does not declare, under the reject policy.
    UnknownConfigField { node_id: NodeId, field: String },
    /// A canvas position has a NaN or infinite coordinate.
    InvalidPosition { node_id: NodeId },
    /// A flow definition is missing required structure.
    MalformedFlowDefinition { reason: String },
}

impl GraphError {
    pub(crate) fn unknown_node_type(category: impl ToString, type_key: impl Into<String>) -> Self {
        Self::UnknownNodeType {
            category: category.to_string(),
            type_key: type_key.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFlowDefinition {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNodeType { category, type_key } => {
                write!(f, "unknown node type: {category}/{type_key}")
            }
            Self::NodeNotFound { node_id } => write!(f, "node not found: {node_id}"),
            Self::EdgeNotFound { edge_id } => write!(f, "edge not found: {edge_id}"),
            Self::InvalidPort { node_id, port_id } => {
                write!(f, "port '{port_id}' is not an output port of node {node_id}")
            }
            Self::SelfLoop { node_id } => write!(f, "node {node_id} cannot connect to itself"),
            Self::FieldTypeError {
                node_id,
                field,
                expected,
            } => {
                write!(
                    f,
                    "config field '{field}' on node {node_id} expects {}",
                    expected.name()
                )
            }
            Self::UnknownConfigField { node_id, field } => {
                write!(f, "node {node_id} has no config field '{field}'")
            }
            Self::InvalidPosition { node_id } => {
                write!(f, "node {node_id} cannot be placed at a non-finite position")
            }
            Self::MalformedFlowDefinition { reason } => {
                write!(f, "malformed flow definition: {reason}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors from building the node type catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A node type with the same category and key is already registered.
    DuplicateNodeType {
        category: NodeCategory,
        type_key: String,
    },
    /// The type key is empty.
    EmptyTypeKey { category: NodeCategory },
    /// The node type declares no output ports.
    NoOutputPorts {
        category: NodeCategory,
        type_key: String,
    },
    /// Two output ports share an id.
    DuplicatePort { type_key: String, port_id: String },
    /// Two config fields share a name.
    DuplicateField { type_key: String, field: String },
    /// An enum field has nothing to choose from.
    EmptyEnumOptions { type_key: String, field: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeType { category, type_key } => {
                write!(f, "node type already registered: {category}/{type_key}")
            }
            Self::EmptyTypeKey { category } => {
                write!(f, "empty type key in category {category}")
            }
            Self::NoOutputPorts { category, type_key } => {
                write!(f, "node type {category}/{type_key} has no output ports")
            }
            Self::DuplicatePort { type_key, port_id } => {
                write!(f, "node type {type_key} declares port '{port_id}' twice")
            }
            Self::DuplicateField { type_key, field } => {
                write!(f, "node type {type_key} declares field '{field}' twice")
            }
            Self::EmptyEnumOptions { type_key, field } => {
                write!(f, "enum field '{field}' on node type {type_key} has no options")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
