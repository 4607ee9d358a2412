//! Differs reading chunk listings whose identities no longer resolve

use chunkwatch_engine::{ComponentValueDiffer, SharedGroupingDiffer};
use chunkwatch_foundation::{ChunkId, ComponentInfo, ComponentTypeId, EntityId, Version};
use chunkwatch_storage::{ChunkSource, ComponentColumn, Query, World};

use crate::common::scene;

/// Delegates to a world but reports a fixed chunk listing.
struct FixedListing<'a> {
    world: &'a World,
    chunks: Vec<ChunkId>,
}

impl ChunkSource for FixedListing<'_> {
    fn current_global_version(&self) -> Version {
        self.world.current_global_version()
    }

    fn component_info(&self, component: ComponentTypeId) -> Option<&ComponentInfo> {
        ChunkSource::component_info(self.world, component)
    }

    fn matching_chunks(&self, _query: &Query) -> Vec<ChunkId> {
        self.chunks.clone()
    }

    fn chunk_change_version(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<Version> {
        self.world.chunk_change_version(chunk, component)
    }

    fn chunk_entities(&self, chunk: ChunkId) -> Option<&[EntityId]> {
        self.world.chunk_entities(chunk)
    }

    fn chunk_component_bytes(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<ComponentColumn<'_>> {
        self.world.chunk_component_bytes(chunk, component)
    }

    fn chunk_shared_value(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<&[u8]> {
        self.world.chunk_shared_value(chunk, component)
    }
}

#[test]
fn value_differ_drops_rows_of_freed_chunk() {
    let mut s = scene();
    let a = s.spawn(10, 1);
    let b = s.spawn(20, 1);
    let chunk = s.world.chunk_of(a).unwrap();

    let mut d = ComponentValueDiffer::new(&s.world, s.hp, Query::new().with(s.hp));
    d.diff(&s.world);

    s.world.destroy(a).unwrap();
    s.world.destroy(b).unwrap();
    assert!(s.world.chunk(chunk).is_none());

    let stale = FixedListing {
        world: &s.world,
        chunks: vec![chunk],
    };
    let changes = d.diff(&stale);
    let removed: Vec<(EntityId, u32)> = changes.removed_as().collect();
    assert_eq!(removed, vec![(a, 10), (b, 20)]);
    assert_eq!(changes.added_count(), 0);
    assert!(changes.added_runs().is_empty());

    // The emptied slot stays quiet while the listing persists.
    s.world.bump_version();
    let stale = FixedListing {
        world: &s.world,
        chunks: vec![chunk],
    };
    assert!(d.diff(&stale).is_empty());
}

#[test]
fn shared_differ_drops_group_of_freed_chunk() {
    let mut s = scene();
    let a = s.spawn(0, 4);
    let b = s.spawn(0, 4);
    let chunk = s.world.chunk_of(a).unwrap();

    let mut d = SharedGroupingDiffer::new(&s.world, s.team, Query::new().with(s.team));
    d.diff(&s.world);

    s.world.destroy(a).unwrap();
    s.world.destroy(b).unwrap();

    let stale = FixedListing {
        world: &s.world,
        chunks: vec![chunk],
    };
    let changes = d.diff(&stale);
    let removed: Vec<(EntityId, u16)> = changes.removed_as().collect();
    assert_eq!(removed, vec![(a, 4), (b, 4)]);
    assert_eq!(changes.added_count(), 0);
    assert_eq!(changes.values().len(), 1);

    s.world.bump_version();
    let stale = FixedListing {
        world: &s.world,
        chunks: vec![chunk],
    };
    assert!(d.diff(&stale).is_empty());
}

#[test]
fn unknown_identity_in_fresh_position() {
    let mut s = scene();
    let a = s.spawn(7, 0);
    let live = s.world.chunk_of(a).unwrap();
    let ghost = ChunkId::new(live.index() + 40, 1);

    let mut d = ComponentValueDiffer::new(&s.world, s.hp, Query::new().with(s.hp));
    let listing = FixedListing {
        world: &s.world,
        chunks: vec![live, ghost],
    };
    let changes = d.diff(&listing);
    assert_eq!(changes.added_as::<u32>().collect::<Vec<_>>(), vec![(a, 7)]);
    assert!(changes.removed_entities().is_empty());
    assert_eq!(d.slot_count(), 2);
}
