// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the trait that needs to be implemented by the type
//! that represents a component, and the placement facts it reports.

use crate::component_category::ComponentCategory;

/**
This trait needs to be implemented by the type that represents a component.

Read more about why this is necessary [here][crate#the-component-trait].

<details>
<summary>Example implementation for a parsed draft component:</summary>

```ignore
impl rscad_component_graph::Component for dfx::Component {
    fn component_id(&self) -> u64 {
        self.uuid.as_u64_pair().0
    }

    fn component_type(&self) -> &str {
        &self.type_name
    }

    fn name(&self) -> String {
        self.enumeration.apply(self.parameters.get("Name").unwrap_or(&self.type_name))
    }

    fn category(&self) -> rscad_component_graph::ComponentCategory {
        use rscad_component_graph::{ComponentCategory as Cat, LineKind};

        match self.type_name.as_str() {
            "BUS" => Cat::Bus,
            "rtds_sharc_sld_BUSLABEL" => Cat::BusLabel {
                linked: self.parameters.enum_index("linkNodes") == Some(1),
            },
            "rtds_sharc_node" => Cat::Node {
                linked: self.parameters.enum_index("linkNode") == Some(1),
            },
            "wirelabel" => Cat::WireLabel,
            "lf_rtds_sharc_sld_TLINE" => Cat::Line(LineKind::Overhead),
            "_rtds_CABLE1.def" => Cat::Line(LineKind::Cable),
            "lf_rtds_sharc_sld_TL16CAL" => Cat::LineCalculation(LineKind::Overhead),
            "_rtds_CBLCAL.def" => Cat::LineCalculation(LineKind::Cable),
            t if t.contains("rtds_XRTRF") => Cat::CrossRackTransformer,
            _ => Cat::Unspecified,
        }
    }

    fn cross_rack_name(&self) -> Option<String> {
        self.parameters
            .get("Tnam1")
            .map(|name| self.enumeration.apply(name))
    }

    fn placement(&self) -> rscad_component_graph::Placement {
        rscad_component_graph::Placement::new(self.x, self.y, self.rotation, self.mirror == 1)
    }

    fn connection_points(&self) -> Vec<rscad_component_graph::ConnectionPoint> {
        self.definition.connection_points()
    }

    fn evaluate(&self, expression: &str) -> Option<i64> {
        self.parameters.resolve_int(expression)
    }
}
```

</details>
*/
pub trait Component {
    /// Returns the identity of the component.  It must be unique across the
    /// whole draft.
    fn component_id(&self) -> u64;

    /// Returns the type tag of the component.
    fn component_type(&self) -> &str;

    /// Returns the display name of the component, with enumerators already
    /// substituted.
    fn name(&self) -> String;

    /// Returns the connectivity category of the component.
    fn category(&self) -> ComponentCategory {
        ComponentCategory::Unspecified
    }

    /// Returns the name that pairs cross-rack lines and transformers.
    ///
    /// Line calculation boxes are paired by their regular name, so this is
    /// only consulted for lines and cross-rack transformers.  Falls back to
    /// [`name`][Component::name] when `None`.
    fn cross_rack_name(&self) -> Option<String> {
        None
    }

    /// Returns the position, rotation and mirror state of the component.
    fn placement(&self) -> Placement;

    /// Returns how the component stretches across the grid.
    fn stretchable(&self) -> Stretchable {
        Stretchable::No
    }

    /// Returns the rectangle spanned by a [`Stretchable::Box`] component,
    /// relative to its placement and before rotation and mirroring.
    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    /// Returns the connection points of the component.
    fn connection_points(&self) -> Vec<ConnectionPoint>;

    /// Resolves a parameter expression used as a connection point offset.
    fn evaluate(&self, _expression: &str) -> Option<i64> {
        None
    }

    /// Returns true for pass-through components like wires and buses.
    fn is_connecting(&self) -> bool {
        false
    }

    /// Returns true for components that connect across hierarchy boundaries
    /// without being a hierarchy box themselves.
    fn is_hierarchy_connecting(&self) -> bool {
        false
    }

    /// Returns true for labels that name the net they are attached to.
    fn is_label(&self) -> bool {
        false
    }
}

/// Position, rotation and mirror state of a placed component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    /// Number of quarter turns, in `0..4`.
    pub rotation: u8,
    pub mirror: bool,
}

impl Placement {
    /// Creates a new `Placement`, normalizing the rotation to `0..4`.
    pub fn new(x: i64, y: i64, rotation: u8, mirror: bool) -> Self {
        Self {
            x,
            y,
            rotation: rotation % 4,
            mirror,
        }
    }

    /// Maps an offset relative to the component to an absolute coordinate.
    ///
    /// The offset is mirrored on the x axis first, then rotated by quarter
    /// turns with `(x, y) -> (-y, x)`, and finally translated.
    pub fn apply(&self, (mut x, mut y): (i64, i64)) -> (i64, i64) {
        if self.mirror {
            x = -x;
        }
        for _ in 0..self.rotation {
            (x, y) = (-y, x);
        }
        (x + self.x, y + self.y)
    }
}

/// How a component extends across the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stretchable {
    #[default]
    No,
    /// Stretches along a single axis between its first two connection
    /// points, like a wire.
    UpDown,
    /// Stretches along both axes, like a hierarchy box.  Every grid cell of
    /// the rectangle's border is a connection point, and the declared
    /// connection points are ignored.
    Box,
}

/// The rectangle spanned by a box-stretchable component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: Coordinate,
    pub y1: Coordinate,
    pub x2: Coordinate,
    pub y2: Coordinate,
}

/// A connection point offset along one axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Coordinate {
    Fixed(i64),
    /// A parameter expression, resolved with [`Component::evaluate`].
    Expression(String),
}

impl From<i64> for Coordinate {
    fn from(value: i64) -> Self {
        Coordinate::Fixed(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Expression(value.to_string())
    }
}

/// Whether a connection point connects to others by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkType {
    #[default]
    Other,
    NameConnected,
    NameConnectedLinked,
}

/// The signal direction of a connection point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeIo {
    #[default]
    Undefined,
    Input,
    Output,
    InputOutput,
    External,
    Default,
    Ground,
    Short,
    FpgaSolver,
    Vsc,
    Electrical,
}

/// A named connection point of a component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionPoint {
    pub name: String,
    pub x: Coordinate,
    pub y: Coordinate,
    pub io: NodeIo,
    pub link_type: LinkType,
    pub link_name: Option<String>,
}

impl ConnectionPoint {
    /// Creates a new `ConnectionPoint` without name-based linking.
    pub fn new(
        name: impl Into<String>,
        x: impl Into<Coordinate>,
        y: impl Into<Coordinate>,
        io: NodeIo,
    ) -> Self {
        Self {
            name: name.into(),
            x: x.into(),
            y: y.into(),
            io,
            link_type: LinkType::Other,
            link_name: None,
        }
    }

    /// Marks the connection point as connected to others by name.
    pub fn with_link(mut self, link_type: LinkType, link_name: Option<String>) -> Self {
        self.link_type = link_type;
        self.link_name = link_name.filter(|name| !name.is_empty());
        self
    }

    /// Returns true if the connection point links to others by name.
    pub fn is_name_connected(&self) -> bool {
        self.link_type != LinkType::Other
    }
}
