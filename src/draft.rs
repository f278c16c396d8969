// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The container tree of a draft, and the connectivity queries on it.

mod composition;
mod editing;
mod lookup;
mod point_traversal;

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::component_traits::Component;
use crate::graph::TopologyGraph;
use crate::local_graph::build_grid_graph;
use crate::position::PositionIndex;
use crate::{Error, TopologyConfig};

/// Addresses a container of a [`Draft`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(usize);

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    /// A top-level container.  Has no header component.
    Subsystem,
    /// A hierarchy box.  Its header is a component of the enclosing scope,
    /// and its members form a scope of their own.
    Hierarchy,
    /// A visual grouping.  Its members belong to the enclosing scope.
    Group,
}

/// An entry of a container.
#[derive(Debug)]
enum Member<C> {
    Component(C),
    /// A nested container, keyed in its parent by the id of its header.
    Container(ContainerId),
}

/// The position index and grid graph of a scope.
#[derive(Debug)]
struct ScopeCache {
    index: PositionIndex,
    grid: TopologyGraph,
}

impl ScopeCache {
    fn build<C: Component>(members: &[&C], grid_size: i64) -> Self {
        let mut index = PositionIndex::default();
        for member in members {
            index.insert(*member, grid_size);
        }
        let grid = build_grid_graph(members.iter().copied(), &index);
        ScopeCache { index, grid }
    }
}

#[derive(Debug)]
struct Container<C> {
    kind: ContainerKind,
    header: Option<C>,
    parent: Option<ContainerId>,
    members: BTreeMap<u64, Member<C>>,
    /// Only ever built for scopes, i.e. containers that aren't groups.
    cache: OnceCell<ScopeCache>,
}

impl<C> Container<C> {
    fn new(kind: ContainerKind, header: Option<C>, parent: Option<ContainerId>) -> Self {
        Self {
            kind,
            header,
            parent,
            members: BTreeMap::new(),
            cache: OnceCell::new(),
        }
    }
}

/// A draft: one or more subsystems, each a tree of components, hierarchy
/// boxes and groups.
///
/// Containers live in an arena and are addressed by [`ContainerId`].
/// Component ids are unique across the whole draft.
///
/// Every scope (a subsystem or a hierarchy, with the members of its groups)
/// caches its position index and grid graph on first use.  Adding, removing
/// and updating components keep the caches current point by point; removing
/// a group drops the cache of its scope.
pub struct Draft<C>
where
    C: Component,
{
    config: TopologyConfig,
    /// Removed containers leave a `None` behind, so ids stay valid.
    containers: Vec<Option<Container<C>>>,
    /// The container each component is a member of.
    owners: HashMap<u64, ContainerId>,
    subsystems: Vec<ContainerId>,
}

/// Internal accessors shared by the `Draft` submodules.
impl<C> Draft<C>
where
    C: Component,
{
    fn container(&self, id: ContainerId) -> Result<&Container<C>, Error> {
        self.containers
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::container_not_found(format!("Container {} not found.", id)))
    }

    fn container_mut(&mut self, id: ContainerId) -> Result<&mut Container<C>, Error> {
        self.containers
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::container_not_found(format!("Container {} not found.", id)))
    }

    /// Returns the nearest container that isn't a group, starting with the
    /// given one.
    fn scope_of(&self, id: ContainerId) -> Result<ContainerId, Error> {
        let mut current = id;
        loop {
            let container = self.container(current)?;
            match (container.kind, container.parent) {
                (ContainerKind::Group, Some(parent)) => current = parent,
                _ => return Ok(current),
            }
        }
    }

    /// Returns the scope enclosing the given scope, if any.
    fn parent_scope(&self, scope: ContainerId) -> Result<Option<ContainerId>, Error> {
        match self.container(scope)?.parent {
            Some(parent) => self.scope_of(parent).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the components that take part in the connectivity of the
    /// given scope: its own members and those of its groups, with hierarchy
    /// boxes represented by their headers.
    fn scope_members(&self, scope: ContainerId) -> Result<Vec<&C>, Error> {
        let mut members = vec![];
        self.collect_scope_members(scope, &mut members)?;
        Ok(members)
    }

    fn collect_scope_members<'a>(
        &'a self,
        id: ContainerId,
        members: &mut Vec<&'a C>,
    ) -> Result<(), Error> {
        for member in self.container(id)?.members.values() {
            match member {
                Member::Component(component) => members.push(component),
                Member::Container(child) => {
                    let nested = self.container(*child)?;
                    match nested.kind {
                        ContainerKind::Group => self.collect_scope_members(*child, members)?,
                        _ => members.extend(nested.header.as_ref()),
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the hierarchies directly inside the given scope, including
    /// those inside its groups.
    fn scope_boxes(&self, scope: ContainerId) -> Result<Vec<ContainerId>, Error> {
        let mut boxes = vec![];
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            for member in self.container(id)?.members.values() {
                if let Member::Container(child) = member {
                    match self.container(*child)?.kind {
                        ContainerKind::Group => stack.push(*child),
                        _ => boxes.push(*child),
                    }
                }
            }
        }
        boxes.sort();
        Ok(boxes)
    }

    /// Returns the cached position index and grid graph of the given scope,
    /// building them if necessary.
    fn scope_cache(&self, scope: ContainerId) -> Result<&ScopeCache, Error> {
        let container = self.container(scope)?;
        if let Some(cache) = container.cache.get() {
            return Ok(cache);
        }
        let members = self.scope_members(scope)?;
        debug!(
            "Building position index of container {} with {} components.",
            scope,
            members.len()
        );
        let cache = ScopeCache::build(&members, self.config.grid_size);
        Ok(container.cache.get_or_init(|| cache))
    }

    /// Returns the component with the given id, which an index of one of the
    /// scopes refers to.
    fn indexed_component(&self, component_id: u64) -> Result<&C, Error> {
        self.component(component_id).ok_or_else(|| {
            Error::inconsistent(format!(
                "Component with id {} is indexed, but not part of the draft.",
                component_id
            ))
        })
    }

    /// Returns the container whose header has the given id, if any.
    fn container_with_header(&self, component_id: u64) -> Option<ContainerId> {
        let owner = self.owners.get(&component_id)?;
        match self.container(*owner).ok()?.members.get(&component_id)? {
            Member::Container(id) => Some(*id),
            Member::Component(_) => None,
        }
    }

    /// Returns true if the container `inner` is nested in `outer`.
    ///
    /// Unless `recursive` is set, only nesting through groups counts, and
    /// only if `include_groups` is set.
    fn is_nested(
        &self,
        inner: ContainerId,
        outer: ContainerId,
        recursive: bool,
        include_groups: bool,
    ) -> bool {
        let mut current = inner;
        loop {
            let Ok(container) = self.container(current) else {
                return false;
            };
            let Some(parent) = container.parent else {
                return false;
            };
            if !recursive && !(include_groups && container.kind == ContainerKind::Group) {
                return false;
            }
            if parent == outer {
                return true;
            }
            current = parent;
        }
    }
}

impl<C> Default for Draft<C>
where
    C: Component,
{
    fn default() -> Self {
        Self::new(TopologyConfig::default())
    }
}
