//! Randomized runs checked against a brute-force model.
//!
//! Each tick, a mirror is updated purely from reported removals and additions. The
//! mirror must then equal the store's actual contents, which proves the diffs are
//! complete and never report a value that was not there.

use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use chunkwatch::engine::{ComponentValueDiffer, DiffConfig, EntitySetDiffer, SharedGroupingDiffer};
use chunkwatch::foundation::{ComponentTypeId, EntityId};
use chunkwatch::storage::{ComponentType, EntityBuilder, Query, World, WorldConfig};

struct Harness {
    world: World,
    hp: ComponentType<u32>,
    team: ComponentType<u8>,
    frozen: ComponentTypeId,
    live: Vec<EntityId>,
}

impl Harness {
    fn new() -> Self {
        let mut world = World::with_config(WorldConfig::small_chunks()).unwrap();
        let hp = world.register::<u32>("hp").unwrap();
        let team = world.register_shared::<u8>("team").unwrap();
        let frozen = world.register_tag("frozen").unwrap();
        Self {
            world,
            hp,
            team,
            frozen,
            live: Vec::new(),
        }
    }

    fn pick(&self, rng: &mut ChaCha8Rng) -> Option<EntityId> {
        if self.live.is_empty() {
            None
        } else {
            Some(self.live[rng.gen_range(0..self.live.len())])
        }
    }

    fn step(&mut self, rng: &mut ChaCha8Rng) {
        match rng.gen_range(0..10) {
            0..=2 => {
                let mut builder = EntityBuilder::new().with_shared(self.team, rng.gen_range(0..3));
                if rng.gen_bool(0.8) {
                    builder = builder.with(self.hp, rng.gen_range(0..1000));
                }
                self.live.push(self.world.spawn_with(builder).unwrap());
            }
            3 => {
                if !self.live.is_empty() {
                    let e = self.live.swap_remove(rng.gen_range(0..self.live.len()));
                    self.world.destroy(e).unwrap();
                }
            }
            4..=5 => {
                if let Some(e) = self.pick(rng) {
                    self.world.set(e, self.hp, rng.gen_range(0..1000)).unwrap();
                }
            }
            6 => {
                if let Some(e) = self.pick(rng) {
                    self.world.set_shared(e, self.team, rng.gen_range(0..3)).unwrap();
                }
            }
            7 => {
                if let Some(e) = self.pick(rng) {
                    self.world.add_tag(e, self.frozen).unwrap();
                }
            }
            8 => {
                if let Some(e) = self.pick(rng) {
                    if self.world.has(e, self.hp) {
                        self.world.remove(e, self.hp).unwrap();
                    }
                }
            }
            _ => {
                self.world.compact().unwrap();
            }
        }
    }

    fn hp_truth(&self) -> HashMap<EntityId, u32> {
        self.world
            .entities()
            .filter_map(|e| self.world.get(e, self.hp).ok().map(|v| (e, v)))
            .collect()
    }

    fn team_truth(&self) -> HashMap<EntityId, u8> {
        self.world
            .entities()
            .filter_map(|e| self.world.get_shared(e, self.team).ok().map(|v| (e, v)))
            .collect()
    }

    fn unfrozen_truth(&self) -> HashSet<EntityId> {
        self.world
            .entities()
            .filter(|e| !self.world.has(*e, self.frozen))
            .collect()
    }
}

fn run(seed: u64, ticks: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut h = Harness::new();

    let mut values = ComponentValueDiffer::new(&h.world, h.hp, Query::new().with(h.hp))
        .with_config(DiffConfig::sequential());
    let mut values_par = ComponentValueDiffer::new(&h.world, h.hp, Query::new().with(h.hp))
        .with_config(DiffConfig::default().with_parallel_threshold(1));
    let mut groups = SharedGroupingDiffer::new(&h.world, h.team, Query::new().with(h.team));
    let mut entities = EntitySetDiffer::new();
    let unfrozen = Query::new().without(h.frozen);

    let mut hp_mirror: HashMap<EntityId, u32> = HashMap::new();
    let mut team_mirror: HashMap<EntityId, u8> = HashMap::new();
    let mut entity_mirror: HashSet<EntityId> = HashSet::new();

    for tick in 0..ticks {
        for _ in 0..rng.gen_range(0..6) {
            h.step(&mut rng);
        }

        let changes = values.diff(&h.world);
        assert_eq!(values_par.diff(&h.world), changes, "seed {seed} tick {tick}: parallel scan diverged");
        for (e, v) in changes.removed_as::<u32>() {
            assert_eq!(hp_mirror.remove(&e), Some(v), "seed {seed} tick {tick}: bad removal of {e:?}");
        }
        for (e, v) in changes.added_as::<u32>() {
            assert_eq!(hp_mirror.insert(e, v), None, "seed {seed} tick {tick}: double add of {e:?}");
        }
        assert_eq!(hp_mirror, h.hp_truth(), "seed {seed} tick {tick}: values");

        let changes = groups.diff(&h.world);
        for (e, v) in changes.removed_as::<u8>() {
            assert_eq!(team_mirror.remove(&e), Some(v), "seed {seed} tick {tick}: bad ungroup of {e:?}");
        }
        for (e, v) in changes.added_as::<u8>() {
            assert_eq!(team_mirror.insert(e, v), None, "seed {seed} tick {tick}: double group of {e:?}");
        }
        assert_eq!(team_mirror, h.team_truth(), "seed {seed} tick {tick}: groups");

        let changes = entities.diff(&h.world, &unfrozen);
        for e in &changes.destroyed {
            assert!(entity_mirror.remove(e), "seed {seed} tick {tick}: unknown destroy {e:?}");
        }
        for e in &changes.created {
            assert!(entity_mirror.insert(*e), "seed {seed} tick {tick}: double create {e:?}");
        }
        assert_eq!(entity_mirror, h.unfrozen_truth(), "seed {seed} tick {tick}: entities");
    }
}

#[test]
fn random_ticks_match_model() {
    for seed in 0..8 {
        run(seed, 150);
    }
}

#[test]
fn busy_ticks_match_model() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut h = Harness::new();
    let mut values = ComponentValueDiffer::new(&h.world, h.hp, Query::new().with(h.hp));
    let mut mirror = HashMap::new();

    for _ in 0..20 {
        for _ in 0..64 {
            h.step(&mut rng);
        }
        let changes = values.diff(&h.world);
        for (e, _) in changes.removed_as::<u32>() {
            mirror.remove(&e);
        }
        mirror.extend(changes.added_as::<u32>());
        assert_eq!(mirror, h.hp_truth());
    }
}
