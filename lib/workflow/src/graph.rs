//! Flow document: the node/edge graph being edited.
//!
//! Nodes and edges live in a petgraph `StableDiGraph`, whose indices stay
//! valid across removals. Its adjacency lists double as the index from a
//! node to its incident edges, so removing a node removes every edge that
//! touches it in the same call.
//!
//! Invariants held by every method:
//! - every edge's source and target exist in the document
//! - node and edge ids are never reused, even after removal

use crate::edge::EdgeInstance;
use crate::error::GraphError;
use crate::node::NodeInstance;
use flowdeck_core::{EdgeId, NodeId};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A named flow graph of node and edge instances.
#[derive(Debug, Clone)]
pub struct FlowDocument {
    name: String,
    graph: StableDiGraph<NodeInstance, EdgeInstance>,
    /// Map from NodeId to petgraph's NodeIndex for O(1) lookup.
    node_index_map: HashMap<NodeId, NodeIndex>,
    /// Map from EdgeId to petgraph's EdgeIndex for O(1) lookup.
    edge_index_map: HashMap<EdgeId, EdgeIndex>,
    retired_nodes: HashSet<NodeId>,
    retired_edges: HashSet<EdgeId>,
}

impl FlowDocument {
    /// Creates a new empty document.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: StableDiGraph::new(),
            node_index_map: HashMap::new(),
            edge_index_map: HashMap::new(),
            retired_nodes: HashSet::new(),
            retired_edges: HashSet::new(),
        }
    }

    /// Returns the document name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Returns a node by its ID.
    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&NodeInstance> {
        let index = self.node_index_map.get(&node_id)?;
        self.graph.node_weight(*index)
    }

    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> Option<&mut NodeInstance> {
        let index = self.node_index_map.get(&node_id)?;
        self.graph.node_weight_mut(*index)
    }

    /// Returns an edge by its ID.
    #[must_use]
    pub fn edge(&self, edge_id: EdgeId) -> Option<&EdgeInstance> {
        let index = self.edge_index_map.get(&edge_id)?;
        self.graph.edge_weight(*index)
    }

    /// Returns true if the node exists.
    #[must_use]
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.node_index_map.contains_key(&node_id)
    }

    /// Returns all nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeInstance> {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index))
    }

    /// Returns all edges, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeInstance> {
        self.graph
            .edge_indices()
            .filter_map(|index| self.graph.edge_weight(index))
    }

    /// Returns all nodes sorted by ID.
    #[must_use]
    pub fn nodes_sorted(&self) -> Vec<&NodeInstance> {
        let mut nodes: Vec<_> = self.nodes().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// Returns all edges sorted by ID.
    #[must_use]
    pub fn edges_sorted(&self) -> Vec<&EdgeInstance> {
        let mut edges: Vec<_> = self.edges().collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the edges leaving a node.
    #[must_use]
    pub fn outgoing_edges(&self, node_id: NodeId) -> Vec<&EdgeInstance> {
        self.directed_edges(node_id, Direction::Outgoing)
    }

    /// Returns the edges entering a node.
    #[must_use]
    pub fn incoming_edges(&self, node_id: NodeId) -> Vec<&EdgeInstance> {
        self.directed_edges(node_id, Direction::Incoming)
    }

    /// Returns the IDs of every edge leaving or entering a node.
    #[must_use]
    pub fn incident_edges(&self, node_id: NodeId) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .outgoing_edges(node_id)
            .into_iter()
            .chain(self.incoming_edges(node_id))
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        // A self-loop is both outgoing and incoming.
        ids.dedup();
        ids
    }

    fn directed_edges(&self, node_id: NodeId, direction: Direction) -> Vec<&EdgeInstance> {
        let Some(&index) = self.node_index_map.get(&node_id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(index, direction)
            .map(|edge| edge.weight())
            .collect()
    }

    /// Returns the successors (downstream nodes) of a node with the edge used.
    #[must_use]
    pub fn successors(&self, node_id: NodeId) -> Vec<(&NodeInstance, &EdgeInstance)> {
        self.outgoing_edges(node_id)
            .into_iter()
            .filter_map(|edge| Some((self.node(edge.target)?, edge)))
            .collect()
    }

    /// Returns the predecessors (upstream nodes) of a node with the edge used.
    #[must_use]
    pub fn predecessors(&self, node_id: NodeId) -> Vec<(&NodeInstance, &EdgeInstance)> {
        self.incoming_edges(node_id)
            .into_iter()
            .filter_map(|edge| Some((self.node(edge.source)?, edge)))
            .collect()
    }

    /// Returns nodes that have no incoming edges.
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<&NodeInstance> {
        self.nodes()
            .filter(|n| self.incoming_edges(n.id).is_empty())
            .collect()
    }

    /// Returns nodes that have no outgoing edges.
    #[must_use]
    pub fn terminal_nodes(&self) -> Vec<&NodeInstance> {
        self.nodes()
            .filter(|n| self.outgoing_edges(n.id).is_empty())
            .collect()
    }

    /// Draws a node ID that has never been used in this document.
    pub(crate) fn allocate_node_id(&self) -> NodeId {
        loop {
            let id = NodeId::new();
            if !self.node_index_map.contains_key(&id) && !self.retired_nodes.contains(&id) {
                return id;
            }
        }
    }

    /// Draws an edge ID that has never been used in this document.
    pub(crate) fn allocate_edge_id(&self) -> EdgeId {
        loop {
            let id = EdgeId::new();
            if !self.edge_index_map.contains_key(&id) && !self.retired_edges.contains(&id) {
                return id;
            }
        }
    }

    /// Adds a node under its own ID.
    ///
    /// Rejects an ID that is live or was used by a removed node.
    pub(crate) fn insert_node(&mut self, node: NodeInstance) -> Result<(), GraphError> {
        let node_id = node.id;
        if self.node_index_map.contains_key(&node_id) || self.retired_nodes.contains(&node_id) {
            return Err(GraphError::malformed(format!("duplicate node id {node_id}")));
        }
        let index = self.graph.add_node(node);
        self.node_index_map.insert(node_id, index);
        Ok(())
    }

    /// Adds an edge between two existing nodes.
    ///
    /// Port validity is the caller's concern; this only guards referential
    /// integrity and ID uniqueness.
    pub(crate) fn insert_edge(&mut self, edge: EdgeInstance) -> Result<(), GraphError> {
        let source_index = *self
            .node_index_map
            .get(&edge.source)
            .ok_or(GraphError::NodeNotFound { node_id: edge.source })?;
        let target_index = *self
            .node_index_map
            .get(&edge.target)
            .ok_or(GraphError::NodeNotFound { node_id: edge.target })?;

        let edge_id = edge.id;
        if self.edge_index_map.contains_key(&edge_id) || self.retired_edges.contains(&edge_id) {
            return Err(GraphError::malformed(format!("duplicate edge id {edge_id}")));
        }
        let index = self.graph.add_edge(source_index, target_index, edge);
        self.edge_index_map.insert(edge_id, index);
        Ok(())
    }

    /// Removes a node together with every edge that touches it.
    ///
    /// Returns the removed node and edges, or `None` if the node is absent.
    pub(crate) fn remove_node(&mut self, node_id: NodeId) -> Option<(NodeInstance, Vec<EdgeInstance>)> {
        let index = *self.node_index_map.get(&node_id)?;

        let mut removed_edges = Vec::new();
        for edge_id in self.incident_edges(node_id) {
            if let Some(edge) = self.remove_edge(edge_id) {
                removed_edges.push(edge);
            }
        }

        let node = self.graph.remove_node(index)?;
        self.node_index_map.remove(&node_id);
        self.retired_nodes.insert(node_id);
        Some((node, removed_edges))
    }

    /// Removes a single edge.
    pub(crate) fn remove_edge(&mut self, edge_id: EdgeId) -> Option<EdgeInstance> {
        let index = self.edge_index_map.remove(&edge_id)?;
        self.retired_edges.insert(edge_id);
        self.graph.remove_edge(index)
    }

    /// Returns the underlying graph for analysis passes.
    pub(crate) fn graph(&self) -> &StableDiGraph<NodeInstance, EdgeInstance> {
        &self.graph
    }

    /// Returns the petgraph index of a node.
    pub(crate) fn index_of(&self, node_id: NodeId) -> Option<NodeIndex> {
        self.node_index_map.get(&node_id).copied()
    }
}

impl Default for FlowDocument {
    fn default() -> Self {
        Self::new("Untitled flow")
    }
}
