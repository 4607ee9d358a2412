//! Entity builders for spawning with an initial component set.

use bytemuck::Pod;
use chunkwatch_foundation::ComponentTypeId;

use crate::registry::ComponentType;

/// Collects the components of an entity before it is spawned.
///
/// Spawning from a builder places the entity directly into its final chunk, so it
/// costs a single structural change regardless of how many components it carries.
/// Adding the same type twice keeps the last value.
#[derive(Clone, Debug, Default)]
pub struct EntityBuilder {
    pub(crate) values: Vec<(ComponentTypeId, Vec<u8>)>,
    pub(crate) shared: Vec<(ComponentTypeId, Vec<u8>)>,
    pub(crate) tags: Vec<ComponentTypeId>,
}

impl EntityBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-entity component value.
    #[must_use]
    pub fn with<T: Pod>(self, component: ComponentType<T>, value: T) -> Self {
        self.with_raw(component.id(), bytemuck::bytes_of(&value))
    }

    /// Adds a per-entity component from raw bytes.
    #[must_use]
    pub fn with_raw(mut self, component: ComponentTypeId, bytes: &[u8]) -> Self {
        upsert(&mut self.values, component, bytes);
        self
    }

    /// Adds a shared component value.
    #[must_use]
    pub fn with_shared<T: Pod>(self, component: ComponentType<T>, value: T) -> Self {
        self.with_shared_raw(component.id(), bytemuck::bytes_of(&value))
    }

    /// Adds a shared component from raw bytes.
    #[must_use]
    pub fn with_shared_raw(mut self, component: ComponentTypeId, bytes: &[u8]) -> Self {
        upsert(&mut self.shared, component, bytes);
        self
    }

    /// Adds a tag component.
    #[must_use]
    pub fn with_tag(mut self, component: ComponentTypeId) -> Self {
        if !self.tags.contains(&component) {
            self.tags.push(component);
        }
        self
    }

    /// Returns every component type the built entity will have.
    pub fn component_types(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.values
            .iter()
            .chain(&self.shared)
            .map(|(id, _)| *id)
            .chain(self.tags.iter().copied())
    }
}

fn upsert(list: &mut Vec<(ComponentTypeId, Vec<u8>)>, component: ComponentTypeId, bytes: &[u8]) {
    match list.iter_mut().find(|(id, _)| *id == component) {
        Some((_, existing)) => *existing = bytes.to_vec(),
        None => list.push((component, bytes.to_vec())),
    }
}
