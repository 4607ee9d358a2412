//! Integration tests for entity storage
//!
//! Tests entity spawning, destruction, generational indices, and stale reference detection.

use chunkwatch_foundation::ErrorKind;
use chunkwatch_storage::{EntityBuilder, World};

// =============================================================================
// Entity Spawning
// =============================================================================

#[test]
fn spawn_multiple_entities() {
    let mut world = World::new();
    let e1 = world.spawn().unwrap();
    let e2 = world.spawn().unwrap();
    let e3 = world.spawn().unwrap();

    assert!(world.exists(e1));
    assert!(world.exists(e2));
    assert!(world.exists(e3));
    assert_eq!(world.entity_count(), 3);
    assert_ne!(e1.index, e2.index);
    assert_ne!(e2.index, e3.index);
}

#[test]
fn spawn_with_components() {
    let mut world = World::new();
    let hp = world.register::<u32>("hp").unwrap();
    let marker = world.register_tag("marker").unwrap();

    let e = world
        .spawn_with(EntityBuilder::new().with(hp, 30).with_tag(marker))
        .unwrap();

    assert_eq!(world.get(e, hp).unwrap(), 30);
    assert!(world.has(e, marker));
}

#[test]
fn spawn_with_unknown_component_fails() {
    let mut world = World::new();
    let err = world
        .spawn_with(EntityBuilder::new().with_raw(chunkwatch_foundation::ComponentTypeId::new(99), &[0]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownComponent(_)));
    assert_eq!(world.entity_count(), 0);
}

// =============================================================================
// Entity Destruction
// =============================================================================

#[test]
fn destroy_entity() {
    let mut world = World::new();
    let entity = world.spawn().unwrap();
    world.destroy(entity).unwrap();

    assert!(!world.exists(entity));
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn destroy_twice_is_stale() {
    let mut world = World::new();
    let entity = world.spawn().unwrap();
    world.destroy(entity).unwrap();

    let err = world.destroy(entity).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleEntity(_)));
}

// =============================================================================
// Generational Indices
// =============================================================================

#[test]
fn reused_index_gets_new_generation() {
    let mut world = World::new();
    let old = world.spawn().unwrap();
    world.destroy(old).unwrap();
    let new = world.spawn().unwrap();

    assert_eq!(old.index, new.index);
    assert_eq!(new.generation, old.generation + 2);
    assert!(!world.exists(old));
    assert!(world.exists(new));
}

#[test]
fn stale_reference_cannot_read() {
    let mut world = World::new();
    let hp = world.register::<u32>("hp").unwrap();
    let old = world.spawn_with(EntityBuilder::new().with(hp, 1)).unwrap();
    world.destroy(old).unwrap();
    world.spawn_with(EntityBuilder::new().with(hp, 2)).unwrap();

    let err = world.get(old, hp).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StaleEntity(_)));
}

#[test]
fn entities_iterates_live_only() {
    let mut world = World::new();
    let a = world.spawn().unwrap();
    let b = world.spawn().unwrap();
    let c = world.spawn().unwrap();
    world.destroy(b).unwrap();

    let live: Vec<_> = world.entities().collect();
    assert_eq!(live, vec![a, c]);
}
