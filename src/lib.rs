// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# RSCAD Component Graph

This is a library for finding out which components of an RSCAD draft are
electrically connected to each other.

A draft is a tree of subsystems, hierarchy boxes and groups, holding placed
components with named connection points.  Components are connected when their
connection points share a grid coordinate, and also through labels, links and
equipment that pairs up by name across racks.  The library turns this into an
undirected [`TopologyGraph`], and answers point-level connectivity queries that
follow a net across hierarchy boundaries.

## The `Component` trait

The main struct is [`Draft`], which owns the components and the containers
they live in.  Components are added with
[`add_component`][Draft::add_component] once the containers have been created
with [`add_subsystem`][Draft::add_subsystem],
[`add_hierarchy`][Draft::add_hierarchy] and [`add_group`][Draft::add_group].

But because this is an independent library, it doesn't know about the type
that represents a parsed component and instead uses a trait to interact with
it.

Therefore, to be usable with this library, the component type must implement
the [`Component`] trait.  Check out the documentation of the trait for a sample
implementation.

## Graphs

- [`local_graph`][Draft::local_graph] returns the connectivity of a single
  container, with hierarchy boxes as single nodes.
- [`composed_graph`][Draft::composed_graph] includes the contents of all
  nested hierarchies, connecting labels on the border of a box to the
  like-named components inside it.
- [`graph`][Draft::graph] joins the composed graphs of all subsystems and
  pairs up cross-rack equipment between them.

Each edge carries an [`EdgeKind`] that tells why the two components are
connected.

## Connectivity queries

- [`connected_to`][Draft::connected_to] walks the graph of the whole draft.
- [`connected_at_point`][Draft::connected_at_point] follows the net at a
  single connection point through wires, buses, labels and links, and into
  the enclosing and nested hierarchies.
- [`connected_to_label`][Draft::connected_to_label] does the same starting at
  the labels with a given name.
*/

mod component_category;
pub use component_category::{ComponentCategory, LineKind};

mod component_traits;
pub use component_traits::{
    BoundingBox, Component, ConnectionPoint, Coordinate, LinkType, NodeIo, Placement, Stretchable,
};

mod config;
pub use config::{TopologyConfig, DEFAULT_GRID_SIZE};

mod draft;
pub use draft::{ContainerId, ContainerKind, Draft};

mod graph;
pub use graph::{iterators, Connection, EdgeKind, GraphNode, TopologyGraph};

mod local_graph;
pub use local_graph::{CrossRackConnections, CrossRackGroup, CrossRackKey};

mod position;

mod error;
pub use error::Error;

#[cfg(test)]
mod test_utils;
