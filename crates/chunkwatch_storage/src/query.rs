//! Archetype queries.

use chunkwatch_foundation::ComponentTypeId;

use crate::archetype::Archetype;

/// Describes which chunks a consumer is interested in.
///
/// A chunk matches when its archetype contains every `with` type and none of the
/// `without` types.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Query {
    all: Vec<ComponentTypeId>,
    none: Vec<ComponentTypeId>,
}

impl Query {
    /// Creates a query that matches every chunk.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a component type.
    #[must_use]
    pub fn with(mut self, component: impl Into<ComponentTypeId>) -> Self {
        let component = component.into();
        if !self.all.contains(&component) {
            self.all.push(component);
        }
        self
    }

    /// Excludes a component type.
    #[must_use]
    pub fn without(mut self, component: impl Into<ComponentTypeId>) -> Self {
        let component = component.into();
        if !self.none.contains(&component) {
            self.none.push(component);
        }
        self
    }

    /// Returns true if the query declares `component` as required.
    #[must_use]
    pub fn requires(&self, component: ComponentTypeId) -> bool {
        self.all.contains(&component)
    }

    /// Returns the required component types.
    #[must_use]
    pub fn required(&self) -> &[ComponentTypeId] {
        &self.all
    }

    /// Returns the excluded component types.
    #[must_use]
    pub fn excluded(&self) -> &[ComponentTypeId] {
        &self.none
    }

    /// Checks whether an archetype matches.
    #[must_use]
    pub fn matches(&self, archetype: &Archetype) -> bool {
        archetype.contains_all(&self.all) && archetype.contains_none(&self.none)
    }
}
