//! Integration tests for event coalescing

use std::collections::HashMap;

use chunkwatch_engine::{EventCoalescer, EventEntry, EventKind, merge_events};

const A: EventKind = EventKind::CREATED_OR_CHANGED;
const B: EventKind = EventKind::REORDERED;
const DESTROYED: EventKind = EventKind::DESTROYED;

fn expected() -> Vec<EventEntry<i32>> {
    vec![
        EventEntry { id: 1, flags: A | DESTROYED },
        EventEntry { id: 2, flags: A | B },
    ]
}

#[test]
fn one_batch() {
    let mut events = Vec::new();
    let mut index = HashMap::new();
    merge_events(&mut events, &mut index, [(1, A), (2, A), (2, B), (2, A), (1, DESTROYED)]);
    assert_eq!(events, expected());
}

#[test]
fn split_batches() {
    let mut events = Vec::new();
    let mut index = HashMap::new();
    merge_events(&mut events, &mut index, [(1, A), (2, A)]);
    merge_events(&mut events, &mut index, [(2, B)]);
    merge_events(&mut events, &mut index, [(2, A), (1, DESTROYED)]);
    assert_eq!(events, expected());
    assert_eq!(index, HashMap::from([(1, 0), (2, 1)]));
}

#[test]
fn coalescer_per_tick() {
    let mut coalescer = EventCoalescer::new();
    coalescer.merge([(1, A), (2, A)]);
    coalescer.merge([(2, B), (2, A), (1, DESTROYED)]);
    assert_eq!(coalescer.take(), expected());

    coalescer.push(3, EventKind::RENAMED | EventKind::PARENT_CHANGED);
    assert_eq!(coalescer.len(), 1);
    assert_eq!(coalescer.flags(3), Some(EventKind::RENAMED | EventKind::PARENT_CHANGED));
}
