// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Resolvers that turn name-keyed groups into edges.

use tracing::trace;

use crate::component_category::ComponentCategory;
use crate::graph::{EdgeKind, TopologyGraph};

use super::{CrossRackConnections, NonGridConnections};

/// A strategy for adding the non-grid edges of one kind of connectivity.
pub(crate) trait Resolver {
    fn resolve(
        &self,
        graph: &mut TopologyGraph,
        connections: &NonGridConnections,
        mark_cross_rack: bool,
    );
}

/// Connects wire labels with the same name.
struct LabelResolver;

/// Connects linked bus labels and nodes with the same name, unless they are
/// already connected.
struct LinkResolver;

/// Pairs up cross-rack equipment.
struct CrossRackResolver;

impl Resolver for LabelResolver {
    fn resolve(&self, graph: &mut TopologyGraph, connections: &NonGridConnections, _: bool) {
        for ids in connections.labels.values() {
            clique(graph, ids, EdgeKind::Label, false);
        }
    }
}

impl Resolver for LinkResolver {
    fn resolve(&self, graph: &mut TopologyGraph, connections: &NonGridConnections, _: bool) {
        for ids in connections.links.values() {
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    if !graph.is_connected(*a, *b) {
                        graph.add_connection(*a, *b, EdgeKind::Link, false);
                    }
                }
            }
        }
    }
}

impl Resolver for CrossRackResolver {
    fn resolve(
        &self,
        graph: &mut TopologyGraph,
        connections: &NonGridConnections,
        mark_cross_rack: bool,
    ) {
        resolve_cross_rack(graph, &connections.cross_rack, mark_cross_rack);
    }
}

/// The resolvers, in the order they are applied.
fn resolvers() -> [&'static dyn Resolver; 3] {
    [&LabelResolver, &LinkResolver, &CrossRackResolver]
}

/// Applies every resolver to the graph.
pub(crate) fn resolve_all(
    graph: &mut TopologyGraph,
    connections: &NonGridConnections,
    mark_cross_rack: bool,
) {
    for resolver in resolvers() {
        resolver.resolve(graph, connections, mark_cross_rack);
    }
}

/// Adds the edges between cross-rack equipment.
///
/// Line ends sharing a name and type are connected with `TLine` edges, and
/// cross-rack transformers with `Xrtrf` edges.  Every line calculation box
/// is connected with a `TLineCalc` edge to each line end of the same name
/// and line kind, unless the two are already connected.
pub(crate) fn resolve_cross_rack(
    graph: &mut TopologyGraph,
    connections: &CrossRackConnections,
    mark_cross_rack: bool,
) {
    for (key, group) in connections.iter() {
        match group.category {
            ComponentCategory::Line(_) => {
                clique(graph, &group.members, EdgeKind::TLine, mark_cross_rack);
            }
            ComponentCategory::CrossRackTransformer => {
                clique(graph, &group.members, EdgeKind::Xrtrf, mark_cross_rack);
            }
            ComponentCategory::LineCalculation(kind) => {
                let ends = connections
                    .iter()
                    .filter(|(k, g)| k.name == key.name && g.category == ComponentCategory::Line(kind))
                    .flat_map(|(_, g)| g.members.iter().copied())
                    .collect::<Vec<_>>();
                for calc in &group.members {
                    for end in &ends {
                        if graph.is_connected(*calc, *end) {
                            continue;
                        }
                        trace!("Connecting line calculation {} to line {}.", calc, end);
                        graph.add_connection(*calc, *end, EdgeKind::TLineCalc, mark_cross_rack);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Connects every two components in `ids` with an edge of the given kind.
fn clique(graph: &mut TopologyGraph, ids: &[u64], kind: EdgeKind, cross_rack: bool) {
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            graph.add_connection(*a, *b, kind, cross_rack);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_graph::graph_node;
    use crate::test_utils::TestComponent;
    use crate::LineKind;

    fn graph_of(components: &[TestComponent]) -> (TopologyGraph, NonGridConnections) {
        let mut graph = TopologyGraph::new();
        for component in components {
            graph.add_node(graph_node(component));
        }
        (graph, NonGridConnections::collect(components))
    }

    #[test]
    fn test_labels() {
        let (mut graph, connections) = graph_of(&[
            TestComponent::wire_label(1, "A", (0, 0)),
            TestComponent::wire_label(2, "A", (64, 0)),
            TestComponent::wire_label(3, "A", (128, 0)),
            TestComponent::wire_label(4, "B", (192, 0)),
        ]);

        resolve_all(&mut graph, &connections, true);

        assert_eq!(graph.connection_count(), 3);
        assert_eq!(graph.count_connections(EdgeKind::Label), 3);
        assert!(graph.is_connected(1, 2));
        assert!(graph.is_connected(2, 3));
        assert!(graph.is_connected(1, 3));
        assert!(graph.connections().all(|c| !c.cross_rack));

        // applying the resolvers again doesn't add edges
        resolve_all(&mut graph, &connections, true);
        assert_eq!(graph.connection_count(), 3);
    }

    #[test]
    fn test_links() {
        let (mut graph, connections) = graph_of(&[
            TestComponent::bus_label(1, "N1", (0, 0), true),
            TestComponent::node(2, "N1", (64, 0), true),
            TestComponent::node(3, "N1", (128, 0), false),
            TestComponent::node(4, "N1", (192, 0), true),
        ]);
        // already connected pairs are skipped
        graph.add_connection(1, 2, EdgeKind::Grid, false);

        resolve_all(&mut graph, &connections, false);

        assert_eq!(graph.count_connections(EdgeKind::Link), 2);
        assert!(graph.connection(1, 2, EdgeKind::Link).is_none());
        assert!(graph.connection(1, 4, EdgeKind::Link).is_some());
        assert!(graph.connection(2, 4, EdgeKind::Link).is_some());
        assert!(!graph.is_connected(1, 3));
    }

    #[test]
    fn test_line_and_calculation() {
        let (mut graph, connections) = graph_of(&[
            TestComponent::line(1, "L1", LineKind::Overhead, (0, 0)),
            TestComponent::line(2, "L1", LineKind::Overhead, (256, 0)),
            TestComponent::line_calculation(3, "L1", LineKind::Overhead, (128, 128)),
            // different kind, same name
            TestComponent::line(4, "L1", LineKind::Cable, (512, 0)),
        ]);

        resolve_all(&mut graph, &connections, true);

        assert_eq!(graph.connection_count(), 3);
        assert_eq!(graph.count_connections(EdgeKind::TLine), 1);
        assert_eq!(graph.count_connections(EdgeKind::TLineCalc), 2);
        assert!(graph.connection(1, 2, EdgeKind::TLine).is_some());
        assert!(graph.connection(3, 1, EdgeKind::TLineCalc).is_some());
        assert!(graph.connection(3, 2, EdgeKind::TLineCalc).is_some());
        assert!(!graph.is_connected(3, 4));
        assert!(graph.connections().all(|c| c.cross_rack));
    }

    #[test]
    fn test_calculation_skips_connected_pairs() {
        let (mut graph, connections) = graph_of(&[
            TestComponent::line(1, "L1", LineKind::Cable, (0, 0)),
            TestComponent::line_calculation(2, "L1", LineKind::Cable, (0, 32)),
        ]);
        graph.add_connection(1, 2, EdgeKind::Grid, false);

        resolve_all(&mut graph, &connections, false);

        assert_eq!(graph.connection_count(), 1);
        assert_eq!(graph.count_connections(EdgeKind::TLineCalc), 0);
    }

    #[test]
    fn test_cross_rack_transformers() {
        let (mut graph, connections) = graph_of(&[
            TestComponent::cross_rack_transformer(1, "T1", (0, 0)),
            TestComponent::cross_rack_transformer(2, "T1", (256, 0)),
            TestComponent::cross_rack_transformer(3, "T2", (512, 0)),
        ]);

        resolve_all(&mut graph, &connections, false);

        assert_eq!(graph.connection_count(), 1);
        assert!(graph
            .connection(1, 2, EdgeKind::Xrtrf)
            .is_some_and(|c| !c.cross_rack));
    }
}
