//! Archetypes: the set of component types an entity has.

use chunkwatch_foundation::ComponentTypeId;

/// Represents a set of component types an entity has.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Archetype {
    /// Component types, sorted for consistent identity.
    components: Vec<ComponentTypeId>,
}

impl Archetype {
    /// Creates a new empty archetype.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Creates an archetype from a list of components.
    #[must_use]
    pub fn from_components(mut components: Vec<ComponentTypeId>) -> Self {
        components.sort_unstable();
        components.dedup();
        Self { components }
    }

    /// Returns the components in this archetype.
    #[must_use]
    pub fn components(&self) -> &[ComponentTypeId] {
        &self.components
    }

    /// Returns the position of a component within the sorted list.
    #[must_use]
    pub fn position(&self, component: ComponentTypeId) -> Option<usize> {
        self.components.binary_search(&component).ok()
    }

    /// Checks if this archetype contains a component.
    #[must_use]
    pub fn contains(&self, component: ComponentTypeId) -> bool {
        self.position(component).is_some()
    }

    /// Returns a new archetype with the component added.
    #[must_use]
    pub fn with_component(&self, component: ComponentTypeId) -> Self {
        match self.components.binary_search(&component) {
            Ok(_) => self.clone(),
            Err(pos) => {
                let mut components = self.components.clone();
                components.insert(pos, component);
                Self { components }
            }
        }
    }

    /// Returns a new archetype with the component removed.
    #[must_use]
    pub fn without_component(&self, component: ComponentTypeId) -> Self {
        let mut components = self.components.clone();
        if let Ok(pos) = components.binary_search(&component) {
            components.remove(pos);
        }
        Self { components }
    }

    /// Checks if this archetype contains all components in another.
    #[must_use]
    pub fn contains_all(&self, other: &[ComponentTypeId]) -> bool {
        other.iter().all(|c| self.contains(*c))
    }

    /// Checks if this archetype contains none of the given components.
    #[must_use]
    pub fn contains_none(&self, other: &[ComponentTypeId]) -> bool {
        !other.iter().any(|c| self.contains(*c))
    }

    /// Returns the number of component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true for the archetype with no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
