//! Shared fixtures for engine tests.

use std::collections::BTreeMap;

use chunkwatch_engine::ComponentChanges;
use chunkwatch_foundation::EntityId;
use chunkwatch_storage::{ComponentType, EntityBuilder, World, WorldConfig};

pub struct Scene {
    pub world: World,
    pub hp: ComponentType<u32>,
    pub team: ComponentType<u16>,
    pub flying: chunkwatch_foundation::ComponentTypeId,
}

pub fn scene() -> Scene {
    let mut world = World::with_config(WorldConfig::small_chunks()).unwrap();
    let hp = world.register::<u32>("hp").unwrap();
    let team = world.register_shared::<u16>("team").unwrap();
    let flying = world.register_tag("flying").unwrap();
    Scene {
        world,
        hp,
        team,
        flying,
    }
}

impl Scene {
    pub fn spawn(&mut self, hp: u32, team: u16) -> EntityId {
        self.world
            .spawn_with(EntityBuilder::new().with(self.hp, hp).with_shared(self.team, team))
            .unwrap()
    }
}

/// Net effect of a value diff once identical remove+add pairs cancel out.
pub fn net(changes: &ComponentChanges) -> (BTreeMap<EntityId, u32>, BTreeMap<EntityId, u32>) {
    let mut added: BTreeMap<_, _> = changes.added_as::<u32>().collect();
    let mut removed: BTreeMap<_, _> = changes.removed_as::<u32>().collect();
    let same: Vec<_> = added
        .iter()
        .filter(|(e, v)| removed.get(e) == Some(v))
        .map(|(e, _)| *e)
        .collect();
    for e in same {
        added.remove(&e);
        removed.remove(&e);
    }
    (added, removed)
}
