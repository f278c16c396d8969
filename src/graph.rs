// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of the electrical connectivity between the
//! components of a draft.

mod creation;
mod retrieval;
mod traversal;

pub mod iterators;

use crate::component_category::ComponentCategory;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use std::collections::HashMap;

/// `GraphNode`s stored in a `StableUnGraph` instance can be addressed with
/// `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any
/// `component_id`, so that nodes in the graph can be retrieved from their
/// `component_id`s.  Indices of a stable graph survive node removal, so the
/// map only needs updating for the removed node itself.
pub(crate) type NodeIndexMap = HashMap<u64, NodeIndex>;

/// The reason two components are connected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Connection points of both components share a grid coordinate.
    Grid,
    /// A bus label on the border of a hierarchy box and the like-named,
    /// like-typed component inside the box.
    Name,
    /// Wire labels with the same name.
    Label,
    /// Linked bus labels or nodes with the same name.
    Link,
    /// Both ends of a distributed line or cable.
    TLine,
    /// A line calculation box and the line ends it configures.
    TLineCalc,
    /// Both sides of a cross-rack transformer.
    Xrtrf,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Grid => write!(f, "Grid"),
            EdgeKind::Name => write!(f, "Name"),
            EdgeKind::Label => write!(f, "Label"),
            EdgeKind::Link => write!(f, "Link"),
            EdgeKind::TLine => write!(f, "TLine"),
            EdgeKind::TLineCalc => write!(f, "TLineCalc"),
            EdgeKind::Xrtrf => write!(f, "Xrtrf"),
        }
    }
}

/// A component, as seen by the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub component_id: u64,
    pub component_type: String,
    pub category: ComponentCategory,
    /// Nesting depth of the container the component was found in, relative
    /// to the container the graph was composed for.
    pub depth: usize,
}

/// A connection between two components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub source: u64,
    pub destination: u64,
    pub kind: EdgeKind,
    /// Set on connections created when pairing cross-rack equipment at the
    /// top of a composition.  Doesn't affect connectivity.
    pub cross_rack: bool,
}

impl Connection {
    /// Returns true if the connection joins the two given components, in
    /// either direction.
    pub fn joins(&self, a: u64, b: u64) -> bool {
        (self.source == a && self.destination == b) || (self.source == b && self.destination == a)
    }
}

/// An undirected multigraph of components and the connections between them.
///
/// Two components can be connected by several edges of different
/// [`EdgeKind`]s, but never by two edges of the same kind.
#[derive(Clone, Debug, Default)]
pub struct TopologyGraph {
    graph: StableUnGraph<GraphNode, Connection>,
    node_indices: NodeIndexMap,
}
