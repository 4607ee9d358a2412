//! Component type registration.
//!
//! Every component type must be registered before it can be stored. Registration
//! fixes the type's size and storage class; typed registration returns a
//! [`ComponentType`] handle that carries the Rust value type for typed access.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use bytemuck::Pod;
use chunkwatch_foundation::{ComponentInfo, ComponentKind, ComponentTypeId, Error, ErrorKind, Result};

/// Typed handle to a registered component type.
///
/// Converts into [`ComponentTypeId`] wherever an untyped ID is accepted.
pub struct ComponentType<T> {
    id: ComponentTypeId,
    marker: PhantomData<fn() -> T>,
}

impl<T> ComponentType<T> {
    const fn new(id: ComponentTypeId) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }

    /// Returns the untyped ID.
    #[must_use]
    pub const fn id(self) -> ComponentTypeId {
        self.id
    }
}

impl<T> Clone for ComponentType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentType<T> {}

impl<T> PartialEq for ComponentType<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ComponentType<T> {}

impl<T> fmt::Debug for ComponentType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType<{}>({})", std::any::type_name::<T>(), self.id.index())
    }
}

impl<T> From<ComponentType<T>> for ComponentTypeId {
    fn from(ty: ComponentType<T>) -> Self {
        ty.id
    }
}

/// Registry of component type metadata, indexed by [`ComponentTypeId`].
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    infos: Vec<ComponentInfo>,
    by_name: HashMap<String, ComponentTypeId>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component type from raw metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if a type with the same name is already registered, or if a
    /// tag is given a non-zero size.
    pub fn register_raw(
        &mut self,
        name: &str,
        size: usize,
        kind: ComponentKind,
        has_entity_refs: bool,
    ) -> Result<ComponentTypeId> {
        if self.by_name.contains_key(name) {
            return Err(Error::new(ErrorKind::DuplicateComponent(name.to_string())));
        }
        if kind == ComponentKind::Tag && size != 0 {
            return Err(Error::size_mismatch(name, 0, size));
        }

        let index = u32::try_from(self.infos.len())
            .map_err(|_| Error::new(ErrorKind::Internal("component id space exhausted".into())))?;
        let id = ComponentTypeId::new(index);
        let mut info = ComponentInfo::new(id, name, size, kind);
        info.has_entity_refs = has_entity_refs;

        self.infos.push(info);
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Registers a per-entity plain data component.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register<T: Pod>(&mut self, name: &str) -> Result<ComponentType<T>> {
        self.register_raw(name, size_of::<T>(), ComponentKind::Data, false)
            .map(ComponentType::new)
    }

    /// Registers a per-entity plain data component whose values embed entity IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_entity_ref<T: Pod>(&mut self, name: &str) -> Result<ComponentType<T>> {
        self.register_raw(name, size_of::<T>(), ComponentKind::Data, true)
            .map(ComponentType::new)
    }

    /// Registers a shared component: one value per chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_shared<T: Pod>(&mut self, name: &str) -> Result<ComponentType<T>> {
        self.register_raw(name, size_of::<T>(), ComponentKind::Shared, false)
            .map(ComponentType::new)
    }

    /// Registers a zero-sized tag component.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_tag(&mut self, name: &str) -> Result<ComponentTypeId> {
        self.register_raw(name, 0, ComponentKind::Tag, false)
    }

    /// Registers a managed component whose values are stored opaquely.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_managed(&mut self, name: &str, size: usize, shared: bool) -> Result<ComponentTypeId> {
        let kind = if shared {
            ComponentKind::ManagedShared
        } else {
            ComponentKind::Managed
        };
        self.register_raw(name, size, kind, false)
    }

    /// Gets metadata for a component type.
    #[must_use]
    pub fn get(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.infos.get(id.index() as usize)
    }

    /// Gets metadata for a component type, failing if it was never registered.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` for unregistered IDs.
    pub fn info(&self, id: ComponentTypeId) -> Result<&ComponentInfo> {
        self.get(id).ok_or_else(|| Error::unknown_component(id))
    }

    /// Looks up a component type by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ComponentTypeId> {
        self.by_name.get(name).copied()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Iterates over all registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInfo> + '_ {
        self.infos.iter()
    }
}
