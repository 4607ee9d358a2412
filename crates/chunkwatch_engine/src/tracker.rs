//! A bundle of differs run together once per tick.

use chunkwatch_foundation::{ComponentTypeId, Error, ErrorKind, Result, Version};
use chunkwatch_storage::{ChunkSource, Query};

use crate::changes::{ComponentChanges, SharedComponentChanges};
use crate::component_differ::ComponentValueDiffer;
use crate::config::DiffConfig;
use crate::entity_differ::{EntityChanges, EntitySetDiffer};
use crate::shared_differ::SharedGroupingDiffer;

/// Everything a [`ChangeTracker`] observed in one update.
#[derive(Clone, Debug, Default)]
pub struct TickChanges {
    /// Update counter, starting at 1.
    pub tick: u64,
    /// The store's global version when the update ran.
    pub global_version: Version,
    /// Entities that started or stopped matching the base query.
    pub entities: EntityChanges,
    /// Value changes per watched component, in watch order.
    pub components: Vec<(String, ComponentChanges)>,
    /// Grouping changes per watched shared component, in watch order.
    pub shared: Vec<(String, SharedComponentChanges)>,
}

impl TickChanges {
    /// Returns true if no differ reported anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.components.iter().all(|(_, c)| c.is_empty())
            && self.shared.iter().all(|(_, c)| c.is_empty())
    }

    /// Returns the value changes of a watched component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentChanges> {
        self.components.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Returns the grouping changes of a watched shared component by name.
    #[must_use]
    pub fn shared(&self, name: &str) -> Option<&SharedComponentChanges> {
        self.shared.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Formats a short human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        use std::fmt::Write;

        if self.is_empty() {
            return "No changes".to_string();
        }

        let mut summary = String::new();
        if !self.entities.created.is_empty() {
            let _ = writeln!(summary, "Created entities: {}", self.entities.created.len());
        }
        if !self.entities.destroyed.is_empty() {
            let _ = writeln!(summary, "Destroyed entities: {}", self.entities.destroyed.len());
        }
        for (name, changes) in &self.components {
            if !changes.is_empty() {
                let _ = writeln!(
                    summary,
                    "{name}: +{} -{}",
                    changes.added_count(),
                    changes.removed_count()
                );
            }
        }
        for (name, changes) in &self.shared {
            if !changes.is_empty() {
                let _ = writeln!(
                    summary,
                    "{name} (shared): +{} -{}",
                    changes.added_count(),
                    changes.removed_count()
                );
            }
        }
        summary.trim_end().to_string()
    }
}

/// Runs an entity differ and any number of component differs over one base query.
///
/// Each watched component narrows the base query to entities that have it.
#[derive(Clone, Debug)]
pub struct ChangeTracker {
    query: Query,
    config: DiffConfig,
    entities: EntitySetDiffer,
    components: Vec<(String, ComponentValueDiffer)>,
    shared: Vec<(String, SharedGroupingDiffer)>,
    tick: u64,
}

impl ChangeTracker {
    /// Creates a tracker over `query` with the default configuration.
    #[must_use]
    pub fn new(query: Query) -> Self {
        Self::with_config(query, DiffConfig::default())
    }

    /// Creates a tracker whose differs share `config`.
    #[must_use]
    pub fn with_config(query: Query, config: DiffConfig) -> Self {
        Self {
            query,
            entities: EntitySetDiffer::with_config(config.clone()),
            config,
            components: Vec::new(),
            shared: Vec::new(),
            tick: 0,
        }
    }

    /// Returns the base query.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the number of updates run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Starts watching a per-entity component's values under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateComponent` if `name` is already watched, or the error
    /// [`ComponentValueDiffer::try_new`] reports.
    pub fn watch_component<S: ChunkSource + ?Sized>(
        &mut self,
        source: &S,
        name: impl Into<String>,
        component: impl Into<ComponentTypeId>,
    ) -> Result<()> {
        let name = self.check_name(name.into())?;
        let component = component.into();
        let differ = ComponentValueDiffer::try_new(source, component, self.query.clone().with(component))?
            .with_config(self.config.clone());
        self.components.push((name, differ));
        Ok(())
    }

    /// Starts watching a shared component's groupings under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateComponent` if `name` is already watched, or the error
    /// [`SharedGroupingDiffer::try_new`] reports.
    pub fn watch_shared<S: ChunkSource + ?Sized>(
        &mut self,
        source: &S,
        name: impl Into<String>,
        component: impl Into<ComponentTypeId>,
    ) -> Result<()> {
        let name = self.check_name(name.into())?;
        let component = component.into();
        let differ = SharedGroupingDiffer::try_new(source, component, self.query.clone().with(component))?
            .with_config(self.config.clone());
        self.shared.push((name, differ));
        Ok(())
    }

    /// Runs every differ once.
    pub fn update<S: ChunkSource + ?Sized>(&mut self, source: &S) -> TickChanges {
        self.tick += 1;
        let changes = TickChanges {
            tick: self.tick,
            global_version: source.current_global_version(),
            entities: self.entities.diff(source, &self.query),
            components: self
                .components
                .iter_mut()
                .map(|(name, differ)| (name.clone(), differ.diff(source)))
                .collect(),
            shared: self
                .shared
                .iter_mut()
                .map(|(name, differ)| (name.clone(), differ.diff(source)))
                .collect(),
        };
        log::debug!("tick {} at {:?}: {}", changes.tick, changes.global_version, changes.summary());
        changes
    }

    fn check_name(&self, name: String) -> Result<String> {
        let taken = self.components.iter().any(|(n, _)| *n == name) || self.shared.iter().any(|(n, _)| *n == name);
        if taken {
            Err(Error::new(ErrorKind::DuplicateComponent(name)))
        } else {
            Ok(name)
        }
    }
}
