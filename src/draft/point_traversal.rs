// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Point-level connectivity queries, which follow the electrical net from a
//! single connection point through wires, buses and labels, and across
//! hierarchy boundaries.

use std::collections::{BTreeMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::component_category::CategoryPredicates;
use crate::component_traits::Component;
use crate::position::PointRef;
use crate::Error;

use super::{ContainerId, Draft};

/// Components of one scope that are joined by name rather than by position,
/// each with the connection point the net enters it at.
#[derive(Debug, Default)]
struct LinkRelation {
    groups: BTreeMap<String, Vec<PointRef>>,
}

impl LinkRelation {
    fn build<'a, C: Component + 'a>(members: impl IntoIterator<Item = &'a C>) -> Self {
        let mut relation = Self::default();
        for member in members {
            let id = member.component_id();
            let points = member.connection_points();
            for point in points.iter().filter(|p| p.is_name_connected()) {
                let key = point.link_name.clone().unwrap_or_else(|| point.name.clone());
                relation.insert(key, PointRef::new(id, point.name.clone()));
            }
            if member.is_cross_rack_transformer() {
                let name = member.cross_rack_name().unwrap_or_else(|| member.name());
                let point = points.first().map(|p| p.name.clone()).unwrap_or_default();
                relation.insert(format!("XRTRF-{name}"), PointRef::new(id, point));
            }
        }
        relation
    }

    fn insert(&mut self, key: String, point: PointRef) {
        let group = self.groups.entry(key).or_default();
        if !group.contains(&point) {
            group.push(point);
        }
    }

    /// Returns the linked points of other components that share a group with
    /// the given component.
    fn partners(&self, component_id: u64) -> impl Iterator<Item = &PointRef> {
        self.groups
            .values()
            .filter(move |group| group.iter().any(|p| p.component_id == component_id))
            .flatten()
            .filter(move |p| p.component_id != component_id)
    }
}

/// The state of a single breadth-first walk through one scope.
struct Walk {
    queue: VecDeque<PointRef>,
    seen: HashSet<PointRef>,
    found: Vec<u64>,
    label: Option<String>,
    boxes: Vec<ContainerId>,
}

impl Walk {
    fn new(seeds: Vec<PointRef>) -> Self {
        Walk {
            seen: seeds.iter().cloned().collect(),
            queue: seeds.into(),
            found: vec![],
            label: None,
            boxes: vec![],
        }
    }

    fn enqueue(&mut self, point: PointRef) {
        if self.seen.insert(point.clone()) {
            self.queue.push_back(point);
        }
    }

    fn record(&mut self, component_id: u64) {
        if !self.found.contains(&component_id) {
            self.found.push(component_id);
        }
    }

    /// Carries the name of a label on the net.  The first name wins.
    fn carry_label(&mut self, name: String) {
        match &self.label {
            None => self.label = Some(name),
            Some(carried) if *carried != name => {
                warn!(
                    "Multiple labels found on one connection: {}, {}. Using {}.",
                    carried, name, carried
                );
            }
            Some(_) => {}
        }
    }
}

/// Point traversal.
impl<C> Draft<C>
where
    C: Component,
{
    /// Returns the components electrically connected to the given connection
    /// point of a component, including the component itself.
    ///
    /// The net is followed through connecting components (wires, buses,
    /// labels) and name-linked points.  When it reaches a hierarchy
    /// connecting component, the search continues in the enclosing scope and
    /// the hierarchies of the current scope, at the labels with the name
    /// carried by the net.
    ///
    /// Connecting and hierarchy connecting components are left out unless
    /// `include_pass_through` is set.  If `component_type` is given, only
    /// components of that type are returned.
    ///
    /// Returns an error if the component doesn't exist, and no components if
    /// it has no connection point with the given name.
    pub fn connected_at_point(
        &self,
        component_id: u64,
        point: &str,
        include_pass_through: bool,
        component_type: Option<&str>,
    ) -> Result<Vec<&C>, Error> {
        let owner = self.owners.get(&component_id).ok_or_else(|| {
            Error::component_not_found(format!("Component with id {} not found.", component_id))
        })?;
        let scope = self.scope_of(*owner)?;
        let has_point = self
            .scope_cache(scope)?
            .index
            .points_of(component_id)
            .any(|p| p.name == point);
        if !has_point {
            debug!(
                "Component {} has no connection point named {}.",
                component_id, point
            );
            return Ok(vec![]);
        }

        let mut visited = HashSet::new();
        let found = self.trace(scope, vec![PointRef::new(component_id, point)], &mut visited)?;
        self.filter_found(found, include_pass_through, component_type)
    }

    /// Returns the components electrically connected to the labels with the
    /// given name in the given container's scope, following the same rules
    /// as [`Draft::connected_at_point`].
    ///
    /// Returns no components if there is no such label.
    pub fn connected_to_label(
        &self,
        container: ContainerId,
        name: &str,
        include_pass_through: bool,
    ) -> Result<Vec<&C>, Error> {
        let scope = self.scope_of(container)?;
        let mut visited = HashSet::new();
        let found = self.trace_label(scope, name, &mut visited)?;
        self.filter_found(found, include_pass_through, None)
    }

    fn filter_found(
        &self,
        found: Vec<u64>,
        include_pass_through: bool,
        component_type: Option<&str>,
    ) -> Result<Vec<&C>, Error> {
        let mut components = vec![];
        for id in found {
            let component = self.indexed_component(id)?;
            if !include_pass_through
                && (component.is_connecting() || component.is_hierarchy_connecting())
            {
                continue;
            }
            if component_type.is_some_and(|t| t != component.component_type()) {
                continue;
            }
            components.push(component);
        }
        Ok(components)
    }

    fn trace_label(
        &self,
        scope: ContainerId,
        name: &str,
        visited: &mut HashSet<ContainerId>,
    ) -> Result<Vec<u64>, Error> {
        let index = &self.scope_cache(scope)?.index;
        let mut seeds = vec![];
        for label in self.scope_members(scope)? {
            if !label.is_label() || label.name() != name {
                continue;
            }
            let id = label.component_id();
            seeds.extend(index.points_of(id).map(|p| PointRef::new(id, p.name.clone())));
        }

        if seeds.is_empty() {
            trace!("No label named {} in container {}.", name, scope);
            visited.insert(scope);
            return Ok(vec![]);
        }
        self.trace(scope, seeds, visited)
    }

    /// Walks the net from the given seeds within one scope, then continues
    /// in the scopes it escalates to.  Scopes in `visited` aren't entered
    /// again.
    fn trace(
        &self,
        scope: ContainerId,
        seeds: Vec<PointRef>,
        visited: &mut HashSet<ContainerId>,
    ) -> Result<Vec<u64>, Error> {
        visited.insert(scope);
        let index = &self.scope_cache(scope)?.index;
        let links = LinkRelation::build(self.scope_members(scope)?);

        let mut walk = Walk::new(seeds);
        for seed in walk.queue.clone() {
            let component = self.indexed_component(seed.component_id)?;
            if component.is_label() {
                walk.carry_label(component.name());
            }
        }

        while let Some(current) = walk.queue.pop_front() {
            trace!(
                "Visiting point {} of component {} in container {}.",
                current.point,
                current.component_id,
                scope
            );
            let neighbors = index
                .at_point(current.component_id, &current.point)
                .into_iter()
                .chain(links.partners(current.component_id))
                .filter(|p| p.component_id != current.component_id)
                .cloned()
                .collect::<Vec<_>>();

            for neighbor in neighbors {
                let component = self.indexed_component(neighbor.component_id)?;
                if component.is_connecting() {
                    walk.enqueue(neighbor.clone());
                } else {
                    walk.record(neighbor.component_id);
                }
                if component.is_label() {
                    walk.carry_label(component.name());
                }
                if let Some(hierarchy) = self.container_with_header(neighbor.component_id) {
                    if !walk.boxes.contains(&hierarchy) {
                        walk.boxes.push(hierarchy);
                    }
                }
            }

            walk.record(current.component_id);
            let component = self.indexed_component(current.component_id)?;
            if component.is_connecting() {
                for point in index.points_of(current.component_id) {
                    walk.enqueue(PointRef::new(current.component_id, point.name.clone()));
                }
            }
        }

        let mut targets = walk.boxes.clone();
        if self.crosses_hierarchy(&walk.found)? {
            targets.extend(self.parent_scope(scope)?);
            targets.extend(self.scope_boxes(scope)?);
        }
        let mut found = walk.found;
        let Some(label) = walk.label else {
            if !targets.is_empty() {
                debug!(
                    "No label on the net in container {}, not escalating.",
                    scope
                );
            }
            return Ok(found);
        };

        for target in targets {
            if visited.contains(&target) {
                continue;
            }
            debug!(
                "Escalating from container {} to container {} at label {}.",
                scope, target, label
            );
            for id in self.trace_label(target, &label, visited)? {
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        }

        Ok(found)
    }

    /// Returns true if any of the given components crosses hierarchy
    /// boundaries without being the header of a hierarchy.
    fn crosses_hierarchy(&self, ids: &[u64]) -> Result<bool, Error> {
        for id in ids {
            let component = self.indexed_component(*id)?;
            if component.is_hierarchy_connecting() && self.container_with_header(*id).is_none() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
