// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Composition of the topology graphs of a [`Draft`].

use tracing::{debug, trace};

use crate::component_traits::Component;
use crate::graph::{EdgeKind, TopologyGraph};
use crate::local_graph::{resolve_all, resolve_cross_rack, CrossRackConnections, NonGridConnections};
use crate::Error;

use super::{ContainerId, Draft};

/// Graph composition.
impl<C> Draft<C>
where
    C: Component,
{
    /// Returns the graph of the given container's scope alone: `Grid` edges
    /// between touching components, plus the label, link and cross-rack
    /// edges among its components.  Hierarchy boxes are single nodes.
    pub fn local_graph(&self, container: ContainerId) -> Result<TopologyGraph, Error> {
        let scope = self.scope_of(container)?;
        let mut graph = self.scope_cache(scope)?.grid.clone();
        let connections = NonGridConnections::collect(self.scope_members(scope)?);
        resolve_all(&mut graph, &connections, false);
        Ok(graph)
    }

    /// Returns the graph of the given container with the contents of all
    /// nested hierarchies, and the cross-rack equipment found in them.
    ///
    /// Bus labels on the border of a hierarchy box are connected by `Name`
    /// edges to the components inside the box with the same name and type.
    /// Label, link and cross-rack groups are resolved once for the whole
    /// tree, so that a name used in several hierarchies forms one group.
    ///
    /// The graph is built anew on every call.
    pub fn composed_graph(
        &self,
        container: ContainerId,
    ) -> Result<(TopologyGraph, CrossRackConnections), Error> {
        let scope = self.scope_of(container)?;
        let (mut graph, connections) = self.compose(scope, 0)?;
        resolve_all(&mut graph, &connections, self.config.mark_cross_rack);
        debug!(
            "Composed graph of container {} with {} nodes and {} connections.",
            scope,
            graph.node_count(),
            graph.connection_count()
        );
        Ok((graph, connections.cross_rack))
    }

    fn compose(
        &self,
        scope: ContainerId,
        depth: usize,
    ) -> Result<(TopologyGraph, NonGridConnections), Error> {
        let mut graph = self.scope_cache(scope)?.grid.clone();
        graph.set_depth(depth);
        let mut connections = NonGridConnections::collect(self.scope_members(scope)?);

        for hierarchy in self.scope_boxes(scope)? {
            let (inner_graph, inner_connections) = self.compose(hierarchy, depth + 1)?;
            graph.union(&inner_graph);

            if let Some(header) = self.header(hierarchy) {
                let inner_members = self.scope_members(hierarchy)?;
                for label_id in graph.boundary_labels(header.component_id()) {
                    let label = self.indexed_component(label_id)?;
                    let name = label.name().to_lowercase();
                    for member in inner_members.iter().filter(|m| {
                        m.component_type() == label.component_type()
                            && m.name().to_lowercase() == name
                    }) {
                        trace!(
                            "Connecting label {} to {} in container {}.",
                            label_id,
                            member.component_id(),
                            hierarchy
                        );
                        graph.add_connection(label_id, member.component_id(), EdgeKind::Name, false);
                    }
                }
            }

            connections.merge(inner_connections);
        }

        Ok((graph, connections))
    }

    /// Returns the graph of the whole draft.
    ///
    /// The composed graphs of all subsystems are joined, and cross-rack
    /// equipment is paired up across subsystems.  Labels and links don't
    /// reach beyond their subsystem.
    pub fn graph(&self) -> Result<TopologyGraph, Error> {
        let mut graph = TopologyGraph::new();
        let mut cross_rack = CrossRackConnections::default();
        for subsystem in &self.subsystems {
            let (subsystem_graph, subsystem_cross_rack) = self.composed_graph(*subsystem)?;
            graph.union(&subsystem_graph);
            cross_rack.merge(subsystem_cross_rack);
        }
        resolve_cross_rack(&mut graph, &cross_rack, self.config.mark_cross_rack);
        Ok(graph)
    }

    /// Returns all components connected to the given one in the graph of the
    /// whole draft, in depth-first order.
    ///
    /// Components connected only through a line calculation box are walked
    /// through, but left out unless `include_all_connections` is set.
    ///
    /// Returns an error if the component isn't part of the graph.
    pub fn connected_to(
        &self,
        component_id: u64,
        include_all_connections: bool,
    ) -> Result<Vec<&C>, Error> {
        self.graph()?
            .connected_to(component_id, include_all_connections)?
            .into_iter()
            .map(|node| self.indexed_component(node.component_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestComponent;
    use crate::{LineKind, TopologyConfig};

    type EdgeSet = Vec<(u64, u64, EdgeKind, bool)>;

    fn edges(graph: &TopologyGraph) -> EdgeSet {
        let mut edges = graph
            .connections()
            .map(|c| {
                (
                    c.source.min(c.destination),
                    c.source.max(c.destination),
                    c.kind,
                    c.cross_rack,
                )
            })
            .collect::<Vec<_>>();
        edges.sort();
        edges
    }

    fn node_ids(graph: &TopologyGraph) -> Vec<u64> {
        let mut ids = graph.nodes().map(|n| n.component_id).collect::<Vec<_>>();
        ids.sort();
        ids
    }

    #[test]
    fn test_labels() -> Result<(), Error> {
        let mut draft = Draft::default();
        let sub = draft.add_subsystem();
        draft.add_component(sub, TestComponent::wire_label(1, "A", (0, 0)))?;
        draft.add_component(sub, TestComponent::wire_label(2, "A", (128, 0)))?;
        draft.add_component(sub, TestComponent::wire_label(3, "A", (256, 0)))?;

        let graph = draft.local_graph(sub)?;
        assert_eq!(
            edges(&graph),
            [
                (1, 2, EdgeKind::Label, false),
                (1, 3, EdgeKind::Label, false),
                (2, 3, EdgeKind::Label, false),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_line_and_calculation() -> Result<(), Error> {
        let mut draft = Draft::default();
        let sub = draft.add_subsystem();
        draft.add_component(sub, TestComponent::line(1, "L1", LineKind::Overhead, (0, 0)))?;
        draft.add_component(sub, TestComponent::line(2, "L1", LineKind::Overhead, (256, 0)))?;
        draft.add_component(
            sub,
            TestComponent::line_calculation(3, "L1", LineKind::Overhead, (128, 128)),
        )?;

        let graph = draft.local_graph(sub)?;
        assert_eq!(
            edges(&graph),
            [
                (1, 2, EdgeKind::TLine, false),
                (1, 3, EdgeKind::TLineCalc, false),
                (2, 3, EdgeKind::TLineCalc, false),
            ]
        );

        // marked when composed
        let (graph, cross_rack) = draft.composed_graph(sub)?;
        assert_eq!(graph.connection_count(), 3);
        assert!(graph.connections().all(|c| c.cross_rack));
        assert_eq!(cross_rack.len(), 2);

        // unless disabled
        let mut unmarked = Draft::new(TopologyConfig {
            mark_cross_rack: false,
            ..Default::default()
        });
        let sub = unmarked.add_subsystem();
        unmarked.add_component(sub, TestComponent::line(1, "L1", LineKind::Cable, (0, 0)))?;
        unmarked.add_component(sub, TestComponent::line(2, "L1", LineKind::Cable, (256, 0)))?;
        let (graph, _) = unmarked.composed_graph(sub)?;
        assert_eq!(edges(&graph), [(1, 2, EdgeKind::TLine, false)]);

        Ok(())
    }

    /// A subsystem with a hierarchy box, a bus running from the box's border
    /// to a bus label `P1`, and a like-named bus label inside the box.
    fn bridged_draft() -> Result<(Draft<TestComponent>, ContainerId, ContainerId), Error> {
        let mut draft = Draft::default();
        let sub = draft.add_subsystem();
        let hierarchy = draft.add_hierarchy(
            sub,
            TestComponent::hierarchy_box(10, "H1", (0, 0), (64, 64)),
        )?;
        draft.add_component(sub, TestComponent::bus(11, "BUS1", (64, 32), (128, 32)))?;
        draft.add_component(sub, TestComponent::bus_label(12, "P1", (128, 32), false))?;
        // not on the border
        draft.add_component(sub, TestComponent::bus_label(13, "P2", (320, 320), false))?;

        draft.add_component(hierarchy, TestComponent::bus_label(20, "p1", (0, 0), false))?;
        // right name, wrong type
        draft.add_component(
            hierarchy,
            TestComponent::terminal(21, "rtds_sharc_sld_RES", "P1", (128, 128)),
        )?;
        draft.add_component(hierarchy, TestComponent::bus_label(22, "P2", (256, 256), false))?;

        Ok((draft, sub, hierarchy))
    }

    #[test]
    fn test_boundary_bridging() -> Result<(), Error> {
        let (draft, sub, hierarchy) = bridged_draft()?;

        let (graph, _) = draft.composed_graph(sub)?;
        assert_eq!(graph.count_connections(EdgeKind::Name), 1);
        assert!(graph.connection(12, 20, EdgeKind::Name).is_some());
        assert_eq!(node_ids(&graph), [10, 11, 12, 13, 20, 21, 22]);
        assert_eq!(graph.node(12).map(|n| n.depth), Ok(0));
        assert_eq!(graph.node(20).map(|n| n.depth), Ok(1));

        // the box's own graph doesn't see the outside
        let (inner, _) = draft.composed_graph(hierarchy)?;
        assert_eq!(node_ids(&inner), [20, 21, 22]);
        assert_eq!(inner.connection_count(), 0);

        Ok(())
    }

    #[test]
    fn test_composition_is_idempotent() -> Result<(), Error> {
        let (mut draft, sub, hierarchy) = bridged_draft()?;
        draft.add_component(sub, TestComponent::wire_label(30, "X", (512, 0)))?;
        draft.add_component(hierarchy, TestComponent::wire_label(31, "X", (512, 0)))?;

        let (first, first_cross_rack) = draft.composed_graph(sub)?;
        let (second, second_cross_rack) = draft.composed_graph(sub)?;

        assert_eq!(node_ids(&first), node_ids(&second));
        assert_eq!(edges(&first), edges(&second));
        assert_eq!(first_cross_rack, second_cross_rack);
        // wire labels merged up from the box
        assert!(first.connection(30, 31, EdgeKind::Label).is_some());

        Ok(())
    }

    #[test]
    fn test_groups_are_transparent() -> Result<(), Error> {
        let mut draft = Draft::default();
        let sub = draft.add_subsystem();
        let group = draft.add_group(sub, TestComponent::group(10, "G1"))?;
        let nested = draft.add_group(group, TestComponent::group(11, "G2"))?;
        let hierarchy = draft.add_hierarchy(
            nested,
            TestComponent::hierarchy_box(12, "H1", (0, 64), (64, 128)),
        )?;
        draft.add_component(sub, TestComponent::wire(1, (0, 0), (0, 64)))?;
        draft.add_component(group, TestComponent::wire_label(2, "A", (0, 0)))?;
        draft.add_component(nested, TestComponent::wire_label(3, "A", (256, 0)))?;
        draft.add_component(hierarchy, TestComponent::wire(4, (0, 0), (0, 64)))?;

        let local = draft.local_graph(group)?;
        assert_eq!(node_ids(&local), [1, 2, 3, 12]);
        assert_eq!(
            edges(&local),
            [
                (1, 2, EdgeKind::Grid, false),
                (1, 12, EdgeKind::Grid, false),
                (2, 3, EdgeKind::Label, false),
            ]
        );

        let (composed, _) = draft.composed_graph(sub)?;
        assert_eq!(node_ids(&composed), [1, 2, 3, 4, 12]);
        assert_eq!(composed.node(4).map(|n| n.depth), Ok(1));

        Ok(())
    }

    #[test]
    fn test_draft_graph() -> Result<(), Error> {
        let mut draft = Draft::default();
        let first = draft.add_subsystem();
        let second = draft.add_subsystem();

        draft.add_component(
            first,
            TestComponent::terminal(1, "rtds_sharc_sld_DYLOAD", "LOAD1", (0, 0)),
        )?;
        draft.add_component(first, TestComponent::line(2, "L1", LineKind::Overhead, (32, 0)))?;
        draft.add_component(
            first,
            TestComponent::line_calculation(3, "L1", LineKind::Overhead, (320, 320)),
        )?;
        draft.add_component(first, TestComponent::wire_label(4, "A", (640, 0)))?;
        draft.add_component(second, TestComponent::line(5, "L1", LineKind::Overhead, (0, 0)))?;
        draft.add_component(
            second,
            TestComponent::terminal(6, "rtds_sharc_sld_DYLOAD", "LOAD2", (32, 0)),
        )?;
        draft.add_component(second, TestComponent::wire_label(7, "A", (640, 0)))?;

        let graph = draft.graph()?;
        assert_eq!(
            edges(&graph),
            [
                (1, 2, EdgeKind::Grid, false),
                (2, 3, EdgeKind::TLineCalc, true),
                (2, 5, EdgeKind::TLine, true),
                (3, 5, EdgeKind::TLineCalc, true),
                (5, 6, EdgeKind::Grid, false),
            ]
        );

        // the calculation box is only reachable over `TLineCalc` edges
        let connected = draft
            .connected_to(1, false)?
            .iter()
            .map(|c| c.component_id())
            .collect::<Vec<_>>();
        assert!(connected.contains(&2));
        assert!(connected.contains(&6));
        assert!(!connected.contains(&3));

        let mut connected = draft
            .connected_to(1, true)?
            .iter()
            .map(|c| c.component_id())
            .collect::<Vec<_>>();
        connected.sort();
        assert_eq!(connected, [2, 3, 5, 6]);

        assert!(draft.connected_to(4, false)?.is_empty());
        assert!(draft
            .connected_to(99, false)
            .is_err_and(|e| e == Error::component_not_found("Component with id 99 not found.")));

        Ok(())
    }
}
