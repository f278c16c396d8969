// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The connectivity of a single scope: `Grid` edges derived from the
//! position index, and the name-keyed groups that the resolvers turn into
//! label, link and cross-rack edges.

mod resolvers;
pub(crate) use resolvers::{resolve_all, resolve_cross_rack};

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::component_category::{CategoryPredicates, ComponentCategory};
use crate::component_traits::Component;
use crate::graph::{EdgeKind, GraphNode, TopologyGraph};
use crate::position::PositionIndex;

/// Returns the graph node for a component, at depth zero.
pub(crate) fn graph_node<C: Component>(component: &C) -> GraphNode {
    GraphNode {
        component_id: component.component_id(),
        component_type: component.component_type().to_string(),
        category: component.category(),
        depth: 0,
    }
}

/// Builds a graph with a node for every member and a `Grid` edge between
/// every two members that have connection points at a common coordinate.
pub(crate) fn build_grid_graph<'a, C: Component + 'a>(
    members: impl IntoIterator<Item = &'a C>,
    index: &PositionIndex,
) -> TopologyGraph {
    let mut graph = TopologyGraph::new();
    for member in members {
        graph.add_node(graph_node(member));
    }

    for occupants in index.occupied() {
        let ids = occupants
            .iter()
            .map(|p| p.component_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                graph.add_connection(*a, *b, EdgeKind::Grid, false);
            }
        }
    }

    debug!(
        "Built grid graph with {} nodes and {} connections.",
        graph.node_count(),
        graph.connection_count()
    );
    graph
}

/// Identifies a group of cross-rack equipment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CrossRackKey {
    pub name: String,
    pub component_type: String,
}

/// Cross-rack equipment of the same type sharing a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossRackGroup {
    pub category: ComponentCategory,
    pub members: Vec<u64>,
}

/// Cross-rack equipment found in a composed graph, grouped by name and
/// type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrossRackConnections {
    groups: BTreeMap<CrossRackKey, CrossRackGroup>,
}

impl CrossRackConnections {
    /// Returns the group for the given name and component type, if any.
    pub fn get(&self, name: &str, component_type: &str) -> Option<&CrossRackGroup> {
        self.groups.get(&CrossRackKey {
            name: name.to_string(),
            component_type: component_type.to_string(),
        })
    }

    /// Returns an iterator over all groups, ordered by name and type.
    pub fn iter(&self) -> impl Iterator<Item = (&CrossRackKey, &CrossRackGroup)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Adds a component to the group of its name and type.
    pub(crate) fn insert<C: Component>(&mut self, component: &C) {
        let category = component.category();
        let name = match category {
            ComponentCategory::LineCalculation(_) => component.name(),
            _ => component
                .cross_rack_name()
                .unwrap_or_else(|| component.name()),
        };
        let key = CrossRackKey {
            name,
            component_type: component.component_type().to_string(),
        };
        self.groups
            .entry(key)
            .or_insert_with(|| CrossRackGroup {
                category,
                members: vec![],
            })
            .members
            .push(component.component_id());
    }

    /// Appends the groups of `other` to the groups with the same key.
    pub(crate) fn merge(&mut self, other: CrossRackConnections) {
        for (key, group) in other.groups {
            match self.groups.get_mut(&key) {
                Some(existing) => existing.members.extend(group.members),
                None => {
                    self.groups.insert(key, group);
                }
            }
        }
    }
}

/// The name-keyed groups of a scope, and of its nested hierarchies once
/// merged upwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NonGridConnections {
    /// Wire labels by name.
    pub(crate) labels: BTreeMap<String, Vec<u64>>,
    /// Linked bus labels and nodes by name.
    pub(crate) links: BTreeMap<String, Vec<u64>>,
    pub(crate) cross_rack: CrossRackConnections,
}

impl NonGridConnections {
    /// Classifies the given components into name-keyed groups.
    pub(crate) fn collect<'a, C: Component + 'a>(members: impl IntoIterator<Item = &'a C>) -> Self {
        let mut connections = Self::default();
        for member in members {
            if member.is_wire_label() {
                connections
                    .labels
                    .entry(member.name())
                    .or_default()
                    .push(member.component_id());
            } else if member.is_linked() {
                connections
                    .links
                    .entry(member.name())
                    .or_default()
                    .push(member.component_id());
            } else if member.is_cross_rack() {
                connections.cross_rack.insert(member);
            }
        }
        connections
    }

    /// Appends the groups of `other` to the groups with the same name.
    pub(crate) fn merge(&mut self, other: NonGridConnections) {
        for (name, ids) in other.labels {
            self.labels.entry(name).or_default().extend(ids);
        }
        for (name, ids) in other.links {
            self.links.entry(name).or_default().extend(ids);
        }
        self.cross_rack.merge(other.cross_rack);
    }
}
