// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for looking up components and containers in a [`Draft`].

use crate::component_traits::Component;
use crate::Error;

use super::{ContainerId, ContainerKind, Draft, Member};

/// Component and container lookup.
impl<C> Draft<C>
where
    C: Component,
{
    /// Returns the component with the given id, wherever it is in the draft.
    ///
    /// Headers of hierarchies and groups are components too.
    pub fn component(&self, component_id: u64) -> Option<&C> {
        let owner = self.owners.get(&component_id)?;
        match self.container(*owner).ok()?.members.get(&component_id)? {
            Member::Component(component) => Some(component),
            Member::Container(id) => self.container(*id).ok()?.header.as_ref(),
        }
    }

    /// Returns the component with the given id, if it is a member of the
    /// given container or of one of its groups, or of any nested container
    /// when `recursive` is set.
    pub fn get(&self, container: ContainerId, component_id: u64, recursive: bool) -> Option<&C> {
        let owner = *self.owners.get(&component_id)?;
        if owner != container && !self.is_nested(owner, container, recursive, true) {
            return None;
        }
        self.component(component_id)
    }

    /// Returns the components with the given name in the given container and
    /// its groups, or in all nested containers when `recursive` is set.
    pub fn find_by_name(
        &self,
        container: ContainerId,
        name: &str,
        recursive: bool,
        case_sensitive: bool,
    ) -> Vec<&C> {
        let matches = |component: &&C| {
            let candidate = component.name();
            if case_sensitive {
                candidate == name
            } else {
                candidate.to_lowercase() == name.to_lowercase()
            }
        };
        self.components(container, recursive)
            .map(|components| components.into_iter().filter(matches).collect())
            .unwrap_or_default()
    }

    /// Returns the components of the given container and its groups,
    /// including the headers of nested containers.  With `recursive`, the
    /// contents of nested hierarchies are included as well.
    ///
    /// Returns an error if the container doesn't exist.
    pub fn components(&self, container: ContainerId, recursive: bool) -> Result<Vec<&C>, Error> {
        let mut components = vec![];
        self.collect_components(container, recursive, &mut components)?;
        Ok(components)
    }

    fn collect_components<'a>(
        &'a self,
        id: ContainerId,
        recursive: bool,
        components: &mut Vec<&'a C>,
    ) -> Result<(), Error> {
        for member in self.container(id)?.members.values() {
            match member {
                Member::Component(component) => components.push(component),
                Member::Container(child) => {
                    let nested = self.container(*child)?;
                    components.extend(nested.header.as_ref());
                    if recursive || nested.kind == ContainerKind::Group {
                        self.collect_components(*child, recursive, components)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns all components of the given type in the draft.
    pub fn components_by_type(&self, component_type: &str) -> Vec<&C> {
        self.subsystems
            .iter()
            .filter_map(|id| self.components(*id, true).ok())
            .flatten()
            .filter(|c| c.component_type() == component_type)
            .collect()
    }

    /// Returns the hierarchies and groups directly in the given container,
    /// or all nested containers when `recursive` is set.
    ///
    /// Returns an error if the container doesn't exist.
    pub fn nested_containers(
        &self,
        container: ContainerId,
        recursive: bool,
    ) -> Result<Vec<ContainerId>, Error> {
        let mut nested = vec![];
        for member in self.container(container)?.members.values() {
            if let Member::Container(child) = member {
                nested.push(*child);
                if recursive {
                    nested.extend(self.nested_containers(*child, true)?);
                }
            }
        }
        Ok(nested)
    }

    /// Returns the subsystems of the draft, in the order they were added.
    pub fn subsystems(&self) -> &[ContainerId] {
        &self.subsystems
    }

    /// Returns the container the given container is nested in.
    pub fn parent(&self, container: ContainerId) -> Option<ContainerId> {
        self.container(container).ok()?.parent
    }

    /// Returns the kind of the given container.
    pub fn container_kind(&self, container: ContainerId) -> Result<ContainerKind, Error> {
        self.container(container).map(|c| c.kind)
    }

    /// Returns the header component of the given hierarchy or group.
    pub fn header(&self, container: ContainerId) -> Option<&C> {
        self.container(container).ok()?.header.as_ref()
    }

    /// Returns the container the given component is a member of.
    pub fn container_of(&self, component_id: u64) -> Option<ContainerId> {
        self.owners.get(&component_id).copied()
    }
}
