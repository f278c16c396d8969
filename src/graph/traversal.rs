// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains methods that help with graph traversal.

use std::collections::HashSet;

use petgraph::visit::EdgeRef;

use crate::{ComponentCategory, Error};

use super::{EdgeKind, GraphNode, TopologyGraph};

/// Traversal methods.
impl TopologyGraph {
    /// Returns all components reachable from the given component, in
    /// depth-first discovery order.
    ///
    /// Every edge is walked, but components discovered over a `TLineCalc`
    /// edge are left out of the result unless `include_all_connections` is
    /// set.  The start component itself is never part of the result.
    pub fn connected_to(
        &self,
        from: u64,
        include_all_connections: bool,
    ) -> Result<Vec<&GraphNode>, Error> {
        let start = self.node_indices.get(&from).ok_or_else(|| {
            Error::component_not_found(format!("Component with id {} not found.", from))
        })?;

        let mut visited = HashSet::from([*start]);
        let mut stack = vec![self.graph.edges(*start)];
        let mut found = vec![];

        while let Some(edges) = stack.last_mut() {
            let Some(edge) = edges.next() else {
                stack.pop();
                continue;
            };
            let child = edge.target();
            if !visited.insert(child) {
                continue;
            }
            if include_all_connections || edge.weight().kind != EdgeKind::TLineCalc {
                found.push(&self.graph[child]);
            }
            stack.push(self.graph.edges(child));
        }

        Ok(found)
    }

    /// Returns the bus labels attached to the border of the given hierarchy
    /// box.
    ///
    /// Starting from the box, the search follows `Grid` connections through
    /// buses only, and doesn't continue past the labels it collects.
    pub(crate) fn boundary_labels(&self, box_id: u64) -> Vec<u64> {
        let Some(&start) = self.node_indices.get(&box_id) else {
            return vec![];
        };

        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];
        let mut labels = vec![];

        while let Some(index) = stack.pop() {
            for edge in self.graph.edges(index) {
                if edge.weight().kind != EdgeKind::Grid {
                    continue;
                }
                let child = edge.target();
                if !visited.insert(child) {
                    continue;
                }
                let node = &self.graph[child];
                match node.category {
                    ComponentCategory::BusLabel { .. } => labels.push(node.component_id),
                    ComponentCategory::Bus => stack.push(child),
                    _ => {}
                }
            }
        }

        labels
    }
}
