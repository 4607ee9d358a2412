//! Coalescing of external change notifications.
//!
//! Notifications arrive as `(id, kind)` pairs, possibly many per object per tick.
//! Merging folds them into one entry per object carrying the union of its kinds,
//! keeping first-seen order.

use std::collections::HashMap;
use std::hash::Hash;

use bitflags::bitflags;
use chunkwatch_foundation::EntityId;

bitflags! {
    /// Kinds of change an object can report.
    ///
    /// Kinds combine by union; `DESTROYED` is an ordinary bit and does not clear the others.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventKind: u8 {
        /// The object was created or one of its values changed.
        const CREATED_OR_CHANGED = 1 << 0;
        /// The object's position among its siblings changed.
        const REORDERED = 1 << 1;
        /// The object was destroyed.
        const DESTROYED = 1 << 2;
        /// The object's display name changed.
        const RENAMED = 1 << 3;
        /// The object was attached to a different parent.
        const PARENT_CHANGED = 1 << 4;
    }
}

/// One coalesced object and every kind of change it reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventEntry<K = EntityId> {
    /// The object.
    pub id: K,
    /// Union of reported kinds.
    pub flags: EventKind,
}

/// Merges `incoming` notifications into `events`, keeping `index` in step.
///
/// A known id has the kind OR-ed into its entry in place. An unknown id is appended
/// and indexed at its new position. `index` must map exactly the ids in `events`
/// to their positions on entry, and does so again on return.
pub fn merge_events<K, I>(events: &mut Vec<EventEntry<K>>, index: &mut HashMap<K, usize>, incoming: I)
where
    K: Copy + Eq + Hash,
    I: IntoIterator<Item = (K, EventKind)>,
{
    for (id, kind) in incoming {
        match index.get(&id) {
            Some(&position) => events[position].flags |= kind,
            None => {
                index.insert(id, events.len());
                events.push(EventEntry { id, flags: kind });
            }
        }
    }
}

/// Owns a coalesced event list and its id index.
#[derive(Clone, Debug)]
pub struct EventCoalescer<K = EntityId> {
    events: Vec<EventEntry<K>>,
    index: HashMap<K, usize>,
}

impl<K> Default for EventCoalescer<K> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> EventCoalescer<K> {
    /// Creates an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a batch of notifications.
    pub fn merge<I: IntoIterator<Item = (K, EventKind)>>(&mut self, incoming: I) {
        merge_events(&mut self.events, &mut self.index, incoming);
    }

    /// Records a single notification.
    pub fn push(&mut self, id: K, kind: EventKind) {
        self.merge([(id, kind)]);
    }

    /// Returns the coalesced flags of an object.
    #[must_use]
    pub fn flags(&self, id: K) -> Option<EventKind> {
        self.index.get(&id).map(|&i| self.events[i].flags)
    }

    /// Returns the coalesced entries in first-seen order.
    #[must_use]
    pub fn events(&self) -> &[EventEntry<K>] {
        &self.events
    }

    /// Returns the number of distinct objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains the coalesced entries, leaving the coalescer empty.
    pub fn take(&mut self) -> Vec<EventEntry<K>> {
        self.index.clear();
        std::mem::take(&mut self.events)
    }
}
