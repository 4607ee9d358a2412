//! An editor-style loop: one tracker per frame, notifications folded per object.

use chunkwatch::engine::{ChangeTracker, EventCoalescer, EventKind, TickChanges};
use chunkwatch::foundation::EntityId;
use chunkwatch::storage::{EntityBuilder, Query, World, WorldConfig};

/// Turns one tick of changes into per-entity notifications.
fn notify(changes: &TickChanges, events: &mut EventCoalescer) {
    events.merge(
        changes
            .entities
            .created
            .iter()
            .map(|e| (*e, EventKind::CREATED_OR_CHANGED)),
    );
    for (_, values) in &changes.components {
        events.merge(
            values
                .added_entities()
                .iter()
                .map(|e| (*e, EventKind::CREATED_OR_CHANGED)),
        );
    }
    for (_, groups) in &changes.shared {
        events.merge(
            groups
                .added_entities()
                .iter()
                .map(|e| (*e, EventKind::PARENT_CHANGED)),
        );
    }
    events.merge(
        changes
            .entities
            .destroyed
            .iter()
            .map(|e| (*e, EventKind::DESTROYED)),
    );
}

#[test]
fn frame_loop() {
    let mut world = World::with_config(WorldConfig::small_chunks()).unwrap();
    let transform = world.register::<[f32; 3]>("transform").unwrap();
    let parent = world.register_shared::<u32>("parent").unwrap();

    let spawn = |world: &mut World, x: f32, p: u32| -> EntityId {
        world
            .spawn_with(
                EntityBuilder::new()
                    .with(transform, [x, 0.0, 0.0])
                    .with_shared(parent, p),
            )
            .unwrap()
    };
    let a = spawn(&mut world, 1.0, 0);
    let b = spawn(&mut world, 2.0, 0);

    let mut tracker = ChangeTracker::new(Query::new());
    tracker.watch_component(&world, "transform", transform).unwrap();
    tracker.watch_shared(&world, "parent", parent).unwrap();
    let mut events = EventCoalescer::new();

    // Frame 1: everything is new.
    let frame = tracker.update(&world);
    notify(&frame, &mut events);
    assert_eq!(events.flags(a), Some(EventKind::CREATED_OR_CHANGED | EventKind::PARENT_CHANGED));
    assert_eq!(events.len(), 2);
    events.take();

    // Frame 2: idle.
    let frame = tracker.update(&world);
    assert!(frame.is_empty());
    notify(&frame, &mut events);
    assert!(events.is_empty());

    // Frame 3: reparent `b`, destroy `a`, spawn `c`.
    world.set_shared(b, parent, 9).unwrap();
    world.destroy(a).unwrap();
    let c = spawn(&mut world, 3.0, 9);

    let frame = tracker.update(&world);
    assert_eq!(frame.tick, 3);
    assert_eq!(frame.entities.created, vec![c]);
    assert_eq!(frame.entities.destroyed, vec![a]);

    let parents: Vec<_> = frame.shared("parent").unwrap().added_as::<u32>().collect();
    assert!(parents.contains(&(b, 9)));
    assert!(parents.contains(&(c, 9)));

    notify(&frame, &mut events);
    assert_eq!(events.flags(a), Some(EventKind::DESTROYED));
    assert!(events.flags(b).unwrap().contains(EventKind::PARENT_CHANGED));
    assert!(events.flags(c).unwrap().contains(EventKind::CREATED_OR_CHANGED));
    let ids: Vec<_> = events.take().into_iter().map(|entry| entry.id).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn summary_reports_each_stream() {
    let mut world = World::new();
    let hp = world.register::<u32>("hp").unwrap();
    let e = world.spawn_with(EntityBuilder::new().with(hp, 10)).unwrap();

    let mut tracker = ChangeTracker::new(Query::new().with(hp));
    tracker.watch_component(&world, "hp", hp).unwrap();
    tracker.update(&world);

    world.set(e, hp, 5).unwrap();
    let frame = tracker.update(&world);
    assert_eq!(frame.summary(), "hp: +1 -1");
    assert_eq!(frame.component("hp").unwrap().removed_as::<u32>().next(), Some((e, 10)));
    assert_eq!(frame.component("hp").unwrap().added_as::<u32>().next(), Some((e, 5)));
}
