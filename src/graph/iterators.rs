// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over nodes and connections in a `TopologyGraph`.

use std::collections::HashSet;

use petgraph::stable_graph::{EdgeIndices, NodeIndices, StableUnGraph};

use super::{Connection, GraphNode};

/// An iterator over the nodes in a `TopologyGraph`.
pub struct Nodes<'a> {
    pub(crate) graph: &'a StableUnGraph<GraphNode, Connection>,
    pub(crate) iter: NodeIndices<'a, GraphNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a GraphNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}

/// An iterator over the connections in a `TopologyGraph`.
pub struct Connections<'a> {
    pub(crate) graph: &'a StableUnGraph<GraphNode, Connection>,
    pub(crate) iter: EdgeIndices<'a, Connection>,
}

impl<'a> Iterator for Connections<'a> {
    type Item = &'a Connection;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| &self.graph[e])
    }
}

/// An iterator over the neighbors of a node in a `TopologyGraph`.
///
/// Components connected by edges of several kinds are yielded once.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a StableUnGraph<GraphNode, Connection>,
    pub(crate) iter: petgraph::stable_graph::Neighbors<'a, Connection>,
    visited: HashSet<u64>,
}

impl<'a> Neighbors<'a> {
    pub(crate) fn new(
        graph: &'a StableUnGraph<GraphNode, Connection>,
        iter: petgraph::stable_graph::Neighbors<'a, Connection>,
    ) -> Self {
        Neighbors {
            graph,
            iter,
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a GraphNode;

    fn next(&mut self) -> Option<Self::Item> {
        for i in self.iter.by_ref() {
            let node = &self.graph[i];
            if !self.visited.insert(node.component_id) {
                continue;
            }
            return Some(node);
        }
        None
    }
}
