// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `ComponentCategory` enum, which represents the
//! connectivity role of a component.

use crate::component_traits::Component;
use std::fmt::Display;

/// Represents the kind of a cross-rack line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKind {
    /// Distributed parameter transmission line.
    Overhead,
    /// Distributed parameter cable.
    Cable,
}

impl Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::Overhead => write!(f, "Overhead"),
            LineKind::Cable => write!(f, "Cable"),
        }
    }
}

/// Represents the category of a component.
///
/// The graph engine only cares about the handful of component types that
/// take part in name-based or cross-rack connectivity.  Everything else is
/// `Unspecified` and connects exclusively through touching connection
/// points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentCategory {
    /// Any component without name-based connectivity.
    Unspecified,
    /// A bus bar.
    Bus,
    /// A bus label, optionally linked to like-named labels and nodes.
    BusLabel { linked: bool },
    /// A node, optionally linked to like-named labels and nodes.
    Node { linked: bool },
    /// A wire label, connected to like-named wire labels.
    WireLabel,
    /// One end of a distributed transmission line or cable.
    Line(LineKind),
    /// The calculation box of a transmission line or cable.
    LineCalculation(LineKind),
    /// One side of a transformer split across racks.
    CrossRackTransformer,
}

impl Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentCategory::Unspecified => write!(f, "Unspecified"),
            ComponentCategory::Bus => write!(f, "Bus"),
            ComponentCategory::BusLabel { linked: false } => write!(f, "BusLabel"),
            ComponentCategory::BusLabel { linked: true } => write!(f, "LinkedBusLabel"),
            ComponentCategory::Node { linked: false } => write!(f, "Node"),
            ComponentCategory::Node { linked: true } => write!(f, "LinkedNode"),
            ComponentCategory::WireLabel => write!(f, "WireLabel"),
            ComponentCategory::Line(kind) => write!(f, "{}Line", kind),
            ComponentCategory::LineCalculation(kind) => write!(f, "{}LineCalculation", kind),
            ComponentCategory::CrossRackTransformer => write!(f, "CrossRackTransformer"),
        }
    }
}

impl ComponentCategory {
    /// Returns true for the bus labels and nodes that opted into linking by
    /// name.
    pub(crate) fn is_linked(&self) -> bool {
        matches!(
            self,
            ComponentCategory::BusLabel { linked: true } | ComponentCategory::Node { linked: true }
        )
    }

    /// Returns true for components whose names pair them with equipment in
    /// other racks.
    pub(crate) fn is_cross_rack(&self) -> bool {
        matches!(
            self,
            ComponentCategory::Line(_)
                | ComponentCategory::LineCalculation(_)
                | ComponentCategory::CrossRackTransformer
        )
    }
}

/// Predicates for checking the component category of a `Component`.
pub(crate) trait CategoryPredicates: Component {
    fn is_wire_label(&self) -> bool {
        self.category() == ComponentCategory::WireLabel
    }

    fn is_linked(&self) -> bool {
        self.category().is_linked()
    }

    fn is_cross_rack(&self) -> bool {
        self.category().is_cross_rack()
    }

    fn is_cross_rack_transformer(&self) -> bool {
        self.category() == ComponentCategory::CrossRackTransformer
    }
}

/// Implement the `CategoryPredicates` trait for all types that implement the
/// `Component` trait.
impl<T: Component> CategoryPredicates for T {}
