// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for building and editing [`TopologyGraph`] instances.

use petgraph::visit::EdgeRef;

use super::{Connection, EdgeKind, GraphNode, TopologyGraph};

/// `TopologyGraph` construction.
impl TopologyGraph {
    /// Creates an empty graph.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a node for a component, unless the graph already has one with the
    /// same id.
    ///
    /// Returns false if the node was already present.
    pub(crate) fn add_node(&mut self, node: GraphNode) -> bool {
        if self.node_indices.contains_key(&node.component_id) {
            return false;
        }
        let cid = node.component_id;
        let idx = self.graph.add_node(node);
        self.node_indices.insert(cid, idx);
        true
    }

    /// Removes the node of the given component, along with all its
    /// connections.
    ///
    /// Returns false if there was no such node.
    pub(crate) fn remove_node(&mut self, component_id: u64) -> bool {
        match self.node_indices.remove(&component_id) {
            Some(idx) => self.graph.remove_node(idx).is_some(),
            None => false,
        }
    }

    /// Connects two components with an edge of the given kind.
    ///
    /// Self-connections and connections to unknown components are ignored.
    /// If the two components are already connected by an edge of the same
    /// kind, no edge is added, but the existing edge takes on the
    /// cross-rack marker when `cross_rack` is set.
    ///
    /// Returns true if a new edge was added.
    pub(crate) fn add_connection(&mut self, a: u64, b: u64, kind: EdgeKind, cross_rack: bool) -> bool {
        if a == b {
            return false;
        }
        let (Some(&a_idx), Some(&b_idx)) = (self.node_indices.get(&a), self.node_indices.get(&b))
        else {
            return false;
        };

        let existing = self
            .graph
            .edges(a_idx)
            .find(|e| e.weight().kind == kind && e.weight().joins(a, b))
            .map(|e| e.id());
        if let Some(edge) = existing {
            if let Some(connection) = self.graph.edge_weight_mut(edge) {
                connection.cross_rack |= cross_rack;
            }
            return false;
        }

        self.graph.add_edge(
            a_idx,
            b_idx,
            Connection {
                source: a,
                destination: b,
                kind,
                cross_rack,
            },
        );
        true
    }

    /// Sets the depth of every node in the graph.
    pub(crate) fn set_depth(&mut self, depth: usize) {
        for idx in self.node_indices.values() {
            if let Some(node) = self.graph.node_weight_mut(*idx) {
                node.depth = depth;
            }
        }
    }

    /// Adds all nodes and connections of `other` to this graph.
    ///
    /// Nodes already present keep their attributes; connections follow the
    /// rules of [`add_connection`][TopologyGraph::add_connection].
    pub(crate) fn union(&mut self, other: &TopologyGraph) {
        for node in other.nodes() {
            self.add_node(node.clone());
        }
        for connection in other.connections() {
            self.add_connection(
                connection.source,
                connection.destination,
                connection.kind,
                connection.cross_rack,
            );
        }
    }
}
