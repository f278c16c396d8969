// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the crate.
//!
//! - the `TestComponent` type, which implements the `Component` trait.
//! - constructors for the component kinds the graph engine treats specially,
//!   so that tests can lay out drafts declaratively.

use std::collections::BTreeMap;

use crate::{
    BoundingBox, Component, ComponentCategory, ConnectionPoint, Coordinate, LineKind, LinkType, NodeIo,
    Placement, Stretchable,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestComponent {
    id: u64,
    component_type: String,
    name: String,
    category: ComponentCategory,
    cross_rack_name: Option<String>,
    placement: Placement,
    stretchable: Stretchable,
    bounding_box: Option<BoundingBox>,
    points: Vec<ConnectionPoint>,
    parameters: BTreeMap<String, i64>,
    connecting: bool,
    hierarchy_connecting: bool,
    label: bool,
}

impl TestComponent {
    pub(crate) fn new(id: u64, component_type: &str, name: &str) -> Self {
        TestComponent {
            id,
            component_type: component_type.to_string(),
            name: name.to_string(),
            category: ComponentCategory::Unspecified,
            cross_rack_name: None,
            placement: Placement::default(),
            stretchable: Stretchable::No,
            bounding_box: None,
            points: vec![],
            parameters: BTreeMap::new(),
            connecting: false,
            hierarchy_connecting: false,
            label: false,
        }
    }

    /// A two-point component of the given type with its first point at `at`
    /// and the second one a grid cell to the right.
    pub(crate) fn terminal(id: u64, component_type: &str, name: &str, at: (i64, i64)) -> Self {
        Self::new(id, component_type, name)
            .placed(at)
            .with_point("A", 0, 0)
            .with_point("B", 32, 0)
    }

    pub(crate) fn wire(id: u64, from: (i64, i64), to: (i64, i64)) -> Self {
        Self::new(id, "WIRE", "WIRE")
            .stretched(from, to)
            .connecting()
    }

    pub(crate) fn bus(id: u64, name: &str, from: (i64, i64), to: (i64, i64)) -> Self {
        Self::new(id, "BUS", name)
            .stretched(from, to)
            .with_category(ComponentCategory::Bus)
            .connecting()
    }

    pub(crate) fn bus_label(id: u64, name: &str, at: (i64, i64), linked: bool) -> Self {
        Self::new(id, "rtds_sharc_sld_BUSLABEL", name)
            .placed(at)
            .with_point("A", 0, 0)
            .with_category(ComponentCategory::BusLabel { linked })
            .connecting()
            .label()
    }

    pub(crate) fn wire_label(id: u64, name: &str, at: (i64, i64)) -> Self {
        Self::new(id, "wirelabel", name)
            .placed(at)
            .with_point("A", 0, 0)
            .with_category(ComponentCategory::WireLabel)
            .connecting()
            .hierarchy_connecting()
            .label()
    }

    pub(crate) fn node(id: u64, name: &str, at: (i64, i64), linked: bool) -> Self {
        Self::new(id, "rtds_sharc_node", name)
            .placed(at)
            .with_point("N", 0, 0)
            .with_category(ComponentCategory::Node { linked })
    }

    pub(crate) fn line(id: u64, name: &str, kind: LineKind, at: (i64, i64)) -> Self {
        let component_type = match kind {
            LineKind::Overhead => "lf_rtds_sharc_sld_TLINE",
            LineKind::Cable => "_rtds_CABLE1.def",
        };
        Self::terminal(id, component_type, &format!("TL{id}"), at)
            .with_category(ComponentCategory::Line(kind))
            .with_cross_rack_name(name)
    }

    pub(crate) fn line_calculation(id: u64, name: &str, kind: LineKind, at: (i64, i64)) -> Self {
        let component_type = match kind {
            LineKind::Overhead => "lf_rtds_sharc_sld_TL16CAL",
            LineKind::Cable => "_rtds_CBLCAL.def",
        };
        Self::new(id, component_type, name)
            .placed(at)
            .with_category(ComponentCategory::LineCalculation(kind))
    }

    pub(crate) fn cross_rack_transformer(id: u64, name: &str, at: (i64, i64)) -> Self {
        Self::terminal(id, "rtds_XRTRF1", &format!("XRTRF{id}"), at)
            .with_category(ComponentCategory::CrossRackTransformer)
            .with_cross_rack_name(name)
    }

    /// A hierarchy box spanning the rectangle from `from` to `to`.
    pub(crate) fn hierarchy_box(id: u64, name: &str, from: (i64, i64), to: (i64, i64)) -> Self {
        let mut component = Self::new(id, "HIERARCHY", name).placed(from);
        component.stretchable = Stretchable::Box;
        component.bounding_box = Some(BoundingBox {
            x1: Coordinate::Fixed(0),
            y1: Coordinate::Fixed(0),
            x2: Coordinate::Fixed(to.0 - from.0),
            y2: Coordinate::Fixed(to.1 - from.1),
        });
        component
    }

    pub(crate) fn group(id: u64, name: &str) -> Self {
        Self::new(id, "GROUP", name)
    }

    pub(crate) fn placed(mut self, (x, y): (i64, i64)) -> Self {
        self.placement = Placement::new(x, y, self.placement.rotation, self.placement.mirror);
        self
    }

    pub(crate) fn at(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub(crate) fn with_point(mut self, name: &str, x: i64, y: i64) -> Self {
        self.points
            .push(ConnectionPoint::new(name, x, y, NodeIo::Electrical));
        self
    }

    pub(crate) fn with_expression_point(mut self, name: &str, x: &str, y: i64) -> Self {
        self.points
            .push(ConnectionPoint::new(name, x, y, NodeIo::Electrical));
        self
    }

    /// Adds a connection point that links to others by name.
    pub(crate) fn with_linked_point(
        mut self,
        name: &str,
        x: i64,
        y: i64,
        link_name: Option<&str>,
    ) -> Self {
        self.points.push(
            ConnectionPoint::new(name, x, y, NodeIo::Electrical)
                .with_link(LinkType::NameConnected, link_name.map(str::to_string)),
        );
        self
    }

    pub(crate) fn with_parameter(mut self, expression: &str, value: i64) -> Self {
        self.parameters.insert(expression.to_string(), value);
        self
    }

    pub(crate) fn with_category(mut self, category: ComponentCategory) -> Self {
        self.category = category;
        self
    }

    pub(crate) fn with_cross_rack_name(mut self, name: &str) -> Self {
        self.cross_rack_name = Some(name.to_string());
        self
    }

    pub(crate) fn connecting(mut self) -> Self {
        self.connecting = true;
        self
    }

    pub(crate) fn hierarchy_connecting(mut self) -> Self {
        self.hierarchy_connecting = true;
        self
    }

    pub(crate) fn label(mut self) -> Self {
        self.label = true;
        self
    }

    /// Places the component at `from` and makes it stretch to `to`.
    fn stretched(mut self, from: (i64, i64), to: (i64, i64)) -> Self {
        self.stretchable = Stretchable::UpDown;
        self.placed(from)
            .with_point("A", 0, 0)
            .with_point("B", to.0 - from.0, to.1 - from.1)
    }
}

impl Component for TestComponent {
    fn component_id(&self) -> u64 {
        self.id
    }

    fn component_type(&self) -> &str {
        &self.component_type
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> ComponentCategory {
        self.category
    }

    fn cross_rack_name(&self) -> Option<String> {
        self.cross_rack_name.clone()
    }

    fn placement(&self) -> Placement {
        self.placement
    }

    fn stretchable(&self) -> Stretchable {
        self.stretchable
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box.clone()
    }

    fn connection_points(&self) -> Vec<ConnectionPoint> {
        self.points.clone()
    }

    fn evaluate(&self, expression: &str) -> Option<i64> {
        self.parameters.get(expression).copied()
    }

    fn is_connecting(&self) -> bool {
        self.connecting
    }

    fn is_hierarchy_connecting(&self) -> bool {
        self.hierarchy_connecting
    }

    fn is_label(&self) -> bool {
        self.label
    }
}
