//! Node instances.
//!
//! A node is one typed step of a flow. Each node has:
//! - An ID that is unique within the document and never changes
//! - The category and type key of its node type
//! - A label, a config map, and an enabled flag the editor can change
//! - An optional canvas position owned by the rendering surface

use crate::field::ConfigMap;
use crate::node_type::{NodeCategory, NodeTypeDefinition};
use flowdeck_core::NodeId;
use serde::{Deserialize, Serialize};

/// Where a node sits on the editing canvas.
///
/// The engine stores and round-trips this value but never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

impl CanvasPosition {
    /// Creates a canvas position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A node in a flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    /// Unique identifier for this node within the document.
    pub id: NodeId,
    /// The node type key within its category.
    pub type_key: String,
    /// The node type category.
    pub category: NodeCategory,
    /// Human-readable label.
    pub label: String,
    /// Config values, shaped by the node type's schema.
    pub config: ConfigMap,
    /// Whether the node takes part in the flow.
    pub enabled: bool,
    /// Canvas position, if the rendering surface has placed the node.
    pub position: Option<CanvasPosition>,
}

impl NodeInstance {
    /// Creates an enabled, unconfigured node of the given type.
    ///
    /// Without a label the node takes the type's default label.
    #[must_use]
    pub fn new(id: NodeId, definition: &NodeTypeDefinition, label: Option<String>) -> Self {
        Self {
            id,
            type_key: definition.type_key.clone(),
            category: definition.category,
            label: label.unwrap_or_else(|| definition.label.clone()),
            config: ConfigMap::new(),
            enabled: true,
            position: None,
        }
    }

    /// Returns true if this node is of the given type.
    #[must_use]
    pub fn is_type(&self, category: NodeCategory, type_key: &str) -> bool {
        self.category == category && self.type_key == type_key
    }

    /// Returns true if this node is a trigger.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.category == NodeCategory::Trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_type() -> NodeTypeDefinition {
        NodeTypeDefinition::new(NodeCategory::Action, "wait", "Wait").with_port("success")
    }

    #[test]
    fn new_node_is_enabled_and_unconfigured() {
        let node = NodeInstance::new(NodeId::new(), &wait_type(), None);
        assert!(node.enabled);
        assert!(node.config.is_empty());
        assert!(node.position.is_none());
        assert_eq!(node.label, "Wait");
        assert!(node.is_type(NodeCategory::Action, "wait"));
        assert!(!node.is_trigger());
    }

    #[test]
    fn explicit_label_overrides_type_label() {
        let node = NodeInstance::new(NodeId::new(), &wait_type(), Some("Cool off".to_string()));
        assert_eq!(node.label, "Cool off");
    }
}
