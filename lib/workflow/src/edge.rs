//! Edge instances.
//!
//! An edge is a control-flow branch: it leaves one node through a named
//! output port and enters another node through that node's single input.

use flowdeck_core::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed connection from a source node's output port to a target node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeInstance {
    /// Unique identifier for this edge within the document.
    pub id: EdgeId,
    /// The node the edge leaves.
    pub source: NodeId,
    /// The output port on the source node.
    pub source_port: String,
    /// The node the edge enters.
    pub target: NodeId,
}

impl EdgeInstance {
    /// Creates a new edge.
    #[must_use]
    pub fn new(id: EdgeId, source: NodeId, source_port: impl Into<String>, target: NodeId) -> Self {
        Self {
            id,
            source,
            source_port: source_port.into(),
            target,
        }
    }

    /// Returns true if the edge leaves or enters the node.
    #[must_use]
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_touches_both_ends() {
        let source = NodeId::new();
        let target = NodeId::new();
        let edge = EdgeInstance::new(EdgeId::new(), source, "yes", target);

        assert!(edge.touches(source));
        assert!(edge.touches(target));
        assert!(!edge.touches(NodeId::new()));
        assert_eq!(edge.source_port, "yes");
    }
}
