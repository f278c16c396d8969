// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating and editing [`Draft`] instances.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::component_traits::Component;
use crate::graph::EdgeKind;
use crate::local_graph::graph_node;
use crate::{Error, TopologyConfig};

use super::{Container, ContainerId, ContainerKind, Draft, Member};

/// `Draft` instantiation and editing.
impl<C> Draft<C>
where
    C: Component,
{
    /// Creates an empty draft.
    pub fn new(config: TopologyConfig) -> Self {
        Self {
            config,
            containers: vec![],
            owners: HashMap::new(),
            subsystems: vec![],
        }
    }

    /// Adds an empty subsystem to the draft.
    pub fn add_subsystem(&mut self) -> ContainerId {
        let id = ContainerId(self.containers.len());
        self.containers
            .push(Some(Container::new(ContainerKind::Subsystem, None, None)));
        self.subsystems.push(id);
        id
    }

    /// Adds an empty hierarchy box to the given container.  The header is
    /// the box itself, as placed in the enclosing scope.
    ///
    /// Returns an error if the container doesn't exist, or if the header's
    /// id is already taken.
    pub fn add_hierarchy(&mut self, parent: ContainerId, header: C) -> Result<ContainerId, Error> {
        self.add_container(parent, ContainerKind::Hierarchy, header)
    }

    /// Adds an empty group to the given container.
    ///
    /// Returns an error if the container doesn't exist, or if the header's
    /// id is already taken.
    pub fn add_group(&mut self, parent: ContainerId, header: C) -> Result<ContainerId, Error> {
        self.add_container(parent, ContainerKind::Group, header)
    }

    fn add_container(
        &mut self,
        parent: ContainerId,
        kind: ContainerKind,
        header: C,
    ) -> Result<ContainerId, Error> {
        let hid = header.component_id();
        self.ensure_unique(hid)?;
        let scope = self.scope_of(parent)?;

        if kind == ContainerKind::Hierarchy {
            self.index_insert(scope, &header);
        }

        let id = ContainerId(self.containers.len());
        self.containers
            .push(Some(Container::new(kind, Some(header), Some(parent))));
        self.container_mut(parent)?
            .members
            .insert(hid, Member::Container(id));
        self.owners.insert(hid, parent);

        Ok(id)
    }

    /// Adds a component to the given container.
    ///
    /// If the position index of the enclosing scope has already been built,
    /// the component's points are merged into it and `Grid` edges to the
    /// components it touches are added, without a rebuild.
    ///
    /// Returns an error if the container doesn't exist, or if a component
    /// with the same id is already part of the draft.
    pub fn add_component(&mut self, container: ContainerId, component: C) -> Result<(), Error> {
        let cid = component.component_id();
        self.ensure_unique(cid)?;
        let scope = self.scope_of(container)?;

        self.index_insert(scope, &component);
        self.container_mut(container)?
            .members
            .insert(cid, Member::Component(component));
        self.owners.insert(cid, container);

        Ok(())
    }

    /// Removes a component from the given container.
    ///
    /// If the component isn't a direct member of the container, it is looked
    /// for in nested containers when `recursive` is set, and in nested groups
    /// when `include_groups` is set.  Removing the header of a hierarchy or
    /// group removes the whole container with its contents.
    ///
    /// Returns false if no such component was found.
    pub fn remove_component(
        &mut self,
        container: ContainerId,
        component_id: u64,
        recursive: bool,
        include_groups: bool,
    ) -> bool {
        let Some(&owner) = self.owners.get(&component_id) else {
            return false;
        };
        if owner != container && !self.is_nested(owner, container, recursive, include_groups) {
            return false;
        }
        let Ok(scope) = self.scope_of(owner) else {
            return false;
        };
        let Some(member) = self
            .container_mut(owner)
            .ok()
            .and_then(|c| c.members.remove(&component_id))
        else {
            return false;
        };
        self.owners.remove(&component_id);

        match member {
            Member::Component(_) => self.index_remove(scope, component_id),
            Member::Container(id) => {
                match self.container(id).map(|c| c.kind) {
                    Ok(ContainerKind::Group) => self.invalidate(scope),
                    _ => self.index_remove(scope, component_id),
                }
                self.drop_container(id);
            }
        }
        trace!("Removed component {} from container {}.", component_id, owner);

        true
    }

    /// Replaces the component with the same id in the given container or
    /// one of its groups.
    ///
    /// Returns false if there is no such component.
    pub fn update_component(&mut self, container: ContainerId, component: C) -> bool {
        let cid = component.component_id();
        let Some(&owner) = self.owners.get(&cid) else {
            return false;
        };
        if owner != container && !self.is_nested(owner, container, false, true) {
            return false;
        }
        let Ok(scope) = self.scope_of(owner) else {
            return false;
        };

        let nested = match self.container(owner).ok().and_then(|c| c.members.get(&cid)) {
            Some(Member::Component(_)) => None,
            Some(Member::Container(id)) => Some(*id),
            None => return false,
        };
        match nested {
            None => {
                self.index_remove(scope, cid);
                self.index_insert(scope, &component);
                if let Ok(c) = self.container_mut(owner) {
                    c.members.insert(cid, Member::Component(component));
                }
            }
            Some(id) => {
                let Ok(nested) = self.container_mut(id) else {
                    return false;
                };
                let kind = nested.kind;
                if kind == ContainerKind::Hierarchy {
                    self.index_remove(scope, cid);
                    self.index_insert(scope, &component);
                }
                if let Ok(nested) = self.container_mut(id) {
                    nested.header = Some(component);
                }
            }
        }

        true
    }

    fn ensure_unique(&self, component_id: u64) -> Result<(), Error> {
        if self.owners.contains_key(&component_id) {
            return Err(Error::duplicate_component(format!(
                "Component with id {} already exists.",
                component_id
            )));
        }
        Ok(())
    }

    /// Adds a component to the cached index and grid graph of a scope, if
    /// they have been built.
    fn index_insert(&mut self, scope: ContainerId, component: &C) {
        let grid_size = self.config.grid_size;
        let Some(cache) = self.container_mut(scope).ok().and_then(|c| c.cache.get_mut()) else {
            return;
        };

        let cid = component.component_id();
        let touching = cache.index.insert(component, grid_size);
        cache.grid.add_node(graph_node(component));
        for other in touching {
            cache.grid.add_connection(cid, other, EdgeKind::Grid, false);
        }
    }

    /// Removes a component from the cached index and grid graph of a scope,
    /// if they have been built.
    fn index_remove(&mut self, scope: ContainerId, component_id: u64) {
        let Some(cache) = self.container_mut(scope).ok().and_then(|c| c.cache.get_mut()) else {
            return;
        };
        cache.index.remove(component_id);
        cache.grid.remove_node(component_id);
    }

    fn invalidate(&mut self, scope: ContainerId) {
        if let Ok(container) = self.container_mut(scope) {
            if container.cache.take().is_some() {
                debug!("Invalidated position index of container {}.", scope);
            }
        }
    }

    /// Drops a removed container and everything nested in it.
    fn drop_container(&mut self, id: ContainerId) {
        let Some(container) = self.containers.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        for (cid, member) in container.members {
            self.owners.remove(&cid);
            if let Member::Container(nested) = member {
                self.drop_container(nested);
            }
        }
    }
}
