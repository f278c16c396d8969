// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes and connections from a [`TopologyGraph`].

use petgraph::visit::EdgeRef;

use crate::iterators::{Connections, Neighbors, Nodes};
use crate::Error;

use super::{Connection, EdgeKind, GraphNode, TopologyGraph};

/// Node and connection retrieval.
impl TopologyGraph {
    /// Returns the node of the component with the given `component_id`, if
    /// it exists.
    pub fn node(&self, component_id: u64) -> Result<&GraphNode, Error> {
        self.node_indices
            .get(&component_id)
            .map(|i| &self.graph[*i])
            .ok_or_else(|| {
                Error::component_not_found(format!("Component with id {} not found.", component_id))
            })
    }

    /// Returns true if the graph has a node for the given component.
    pub fn contains(&self, component_id: u64) -> bool {
        self.node_indices.contains_key(&component_id)
    }

    /// Returns an iterator over the nodes in the graph.
    pub fn nodes(&self) -> Nodes {
        Nodes {
            graph: &self.graph,
            iter: self.graph.node_indices(),
        }
    }

    /// Returns an iterator over the connections in the graph.
    pub fn connections(&self) -> Connections {
        Connections {
            graph: &self.graph,
            iter: self.graph.edge_indices(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the number of connections of the given kind.
    pub fn count_connections(&self, kind: EdgeKind) -> usize {
        self.connections().filter(|c| c.kind == kind).count()
    }

    /// Returns the connection of the given kind between two components, if
    /// there is one.
    pub fn connection(&self, a: u64, b: u64, kind: EdgeKind) -> Option<&Connection> {
        self.connections_between(a, b).find(|c| c.kind == kind)
    }

    /// Returns true if the two components are connected by an edge of any
    /// kind.
    pub fn is_connected(&self, a: u64, b: u64) -> bool {
        self.connections_between(a, b).next().is_some()
    }

    /// Returns an iterator over the connections of the component with the
    /// given `component_id`.
    ///
    /// Returns an error if the given `component_id` does not exist.
    pub fn connections_of(
        &self,
        component_id: u64,
    ) -> Result<impl Iterator<Item = &Connection>, Error> {
        self.node_indices
            .get(&component_id)
            .map(|&index| self.graph.edges(index).map(|e| e.weight()))
            .ok_or_else(|| {
                Error::component_not_found(format!("Component with id {} not found.", component_id))
            })
    }

    /// Returns an iterator over the *neighbors* of the component with the
    /// given `component_id`.
    ///
    /// Returns an error if the given `component_id` does not exist.
    pub fn neighbors(&self, component_id: u64) -> Result<Neighbors, Error> {
        self.node_indices
            .get(&component_id)
            .map(|&index| Neighbors::new(&self.graph, self.graph.neighbors(index)))
            .ok_or_else(|| {
                Error::component_not_found(format!("Component with id {} not found.", component_id))
            })
    }

    fn connections_between(&self, a: u64, b: u64) -> impl Iterator<Item = &Connection> {
        self.node_indices
            .get(&a)
            .into_iter()
            .flat_map(move |&index| self.graph.edges(index))
            .map(|e| e.weight())
            .filter(move |c| c.joins(a, b))
    }
}
