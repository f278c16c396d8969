// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The position index, which maps absolute grid coordinates to the
//! connection points occupying them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::warn;

use crate::component_traits::{Component, Coordinate, Stretchable};

/// An absolute `(x, y)` grid coordinate.
pub(crate) type Position = (i64, i64);

/// Prefix of the names given to synthesized stretch points.
const STRETCH_PREFIX: &str = "stretch";

/// A connection point of a specific component.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PointRef {
    pub(crate) component_id: u64,
    pub(crate) point: String,
}

impl PointRef {
    pub(crate) fn new(component_id: u64, point: impl Into<String>) -> Self {
        Self {
            component_id,
            point: point.into(),
        }
    }
}

/// A connection point resolved to its absolute grid coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PlacedPoint {
    pub(crate) name: String,
    pub(crate) position: Position,
}

/// Resolves a coordinate, falling back to `0` for expressions the component
/// can't evaluate.
fn resolve<C: Component>(component: &C, coordinate: &Coordinate) -> i64 {
    match coordinate {
        Coordinate::Fixed(value) => *value,
        Coordinate::Expression(expr) => component.evaluate(expr).unwrap_or_else(|| {
            warn!(
                "Can't resolve expression {:?} of component {}, using 0.",
                expr,
                component.component_id()
            );
            0
        }),
    }
}

/// Returns the grid values between `a` and `b` inclusive, in steps of
/// `grid_size`.
fn grid_range(a: i64, b: i64, grid_size: i64) -> Vec<i64> {
    (a.min(b)..=a.max(b))
        .step_by(grid_size.max(1) as usize)
        .collect()
}

/// Returns the relative offsets of the synthesized stretch points of the
/// given component, before rotation and mirroring.
fn stretch_offsets<C: Component>(
    component: &C,
    declared: &[(String, (i64, i64))],
    grid_size: i64,
) -> Vec<(i64, i64)> {
    match component.stretchable() {
        Stretchable::No => vec![],
        Stretchable::UpDown => {
            // The first two points are the ends of the stretched axis.
            let [(_, (x1, y1)), (_, (x2, y2)), ..] = declared else {
                warn!(
                    "Stretchable component {} has less than two connection points.",
                    component.component_id()
                );
                return vec![];
            };
            let mut cells = vec![];
            for x in grid_range(*x1, *x2, grid_size) {
                for y in grid_range(*y1, *y2, grid_size) {
                    cells.push((x, y));
                }
            }
            // The outermost cells are the declared end points.
            if cells.len() <= 2 {
                return vec![];
            }
            cells[1..cells.len() - 1].to_vec()
        }
        Stretchable::Box => {
            let Some(bbox) = component.bounding_box() else {
                warn!(
                    "Box stretchable component {} has no bounding box.",
                    component.component_id()
                );
                return vec![];
            };
            let xs = grid_range(
                resolve(component, &bbox.x1),
                resolve(component, &bbox.x2),
                grid_size,
            );
            let ys = grid_range(
                resolve(component, &bbox.y1),
                resolve(component, &bbox.y2),
                grid_size,
            );
            let mut columns = vec![xs[0], xs[xs.len() - 1]];
            columns.dedup();
            let mut rows = vec![ys[0], ys[ys.len() - 1]];
            rows.dedup();

            let mut cells = vec![];
            for x in &columns {
                for y in &ys {
                    cells.push((*x, *y));
                }
            }
            let inner_xs = if xs.len() > 2 { &xs[1..xs.len() - 1] } else { &[] };
            for y in &rows {
                for x in inner_xs {
                    cells.push((*x, *y));
                }
            }
            cells
        }
    }
}

/// Returns all connection points of the given component at their absolute
/// coordinates, including synthesized stretch points.
pub(crate) fn placed_points<C: Component>(component: &C, grid_size: i64) -> Vec<PlacedPoint> {
    let placement = component.placement();
    let declared = match component.stretchable() {
        // The border replaces the declared points.
        Stretchable::Box => vec![],
        Stretchable::No | Stretchable::UpDown => component
            .connection_points()
            .into_iter()
            .map(|cp| {
                let offset = (resolve(component, &cp.x), resolve(component, &cp.y));
                (cp.name, offset)
            })
            .collect::<Vec<_>>(),
    };

    let stretched = stretch_offsets(component, &declared, grid_size)
        .into_iter()
        .enumerate()
        .map(|(i, offset)| (format!("{STRETCH_PREFIX}{i}"), offset));

    declared
        .into_iter()
        .chain(stretched)
        .map(|(name, offset)| PlacedPoint {
            name,
            position: placement.apply(offset),
        })
        .collect()
}

/// Maps absolute grid coordinates to the connection points registered there.
#[derive(Clone, Debug, Default)]
pub(crate) struct PositionIndex {
    by_position: BTreeMap<Position, BTreeSet<PointRef>>,
    by_component: HashMap<u64, Vec<PlacedPoint>>,
}

impl PositionIndex {
    /// Registers all connection points of the given component.
    ///
    /// Returns the ids of the other components that share at least one
    /// coordinate with it.
    pub(crate) fn insert<C: Component>(&mut self, component: &C, grid_size: i64) -> BTreeSet<u64> {
        let cid = component.component_id();
        let points = placed_points(component, grid_size);
        let mut touching = BTreeSet::new();

        for point in &points {
            let occupants = self.by_position.entry(point.position).or_default();
            touching.extend(
                occupants
                    .iter()
                    .map(|p| p.component_id)
                    .filter(|id| *id != cid),
            );
            occupants.insert(PointRef::new(cid, point.name.clone()));
        }
        self.by_component.entry(cid).or_default().extend(points);

        touching
    }

    /// Removes the connection points of the given component, leaving other
    /// occupants of the same coordinates in place.
    ///
    /// Returns false if the component wasn't indexed.
    pub(crate) fn remove(&mut self, component_id: u64) -> bool {
        let Some(points) = self.by_component.remove(&component_id) else {
            return false;
        };
        for point in points {
            if let Some(occupants) = self.by_position.get_mut(&point.position) {
                occupants.remove(&PointRef::new(component_id, point.name));
                if occupants.is_empty() {
                    self.by_position.remove(&point.position);
                }
            }
        }
        true
    }

    /// Returns the connection points that share a coordinate with the given
    /// point of the given component, excluding the point itself.
    pub(crate) fn at_point(&self, component_id: u64, point: &str) -> Vec<&PointRef> {
        let this = PointRef::new(component_id, point);
        self.points_of(component_id)
            .filter(|p| p.name == point)
            .filter_map(|p| self.by_position.get(&p.position))
            .flatten()
            .filter(|p| **p != this)
            .collect()
    }

    /// Returns the placed connection points of the given component.
    pub(crate) fn points_of(&self, component_id: u64) -> impl Iterator<Item = &PlacedPoint> {
        self.by_component.get(&component_id).into_iter().flatten()
    }

    /// Returns the occupants of every coordinate in the index.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = &BTreeSet<PointRef>> {
        self.by_position.values()
    }
}
