//! Snapshot set differencing.
//!
//! A [`SetDiffer`] remembers the set of values it saw on its previous call and
//! reports which values appeared and which disappeared since then. Input order and
//! duplicates are irrelevant; output order is unspecified.

use std::collections::HashSet;
use std::hash::Hash;

/// Values added and removed between two snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetChanges<T> {
    /// Values present now but not in the previous snapshot.
    pub added: Vec<T>,
    /// Values present in the previous snapshot but not now.
    pub removed: Vec<T>,
}

impl<T> Default for SetChanges<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<T> SetChanges<T> {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Empties both lists, keeping their allocations.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }
}

/// Computes added and removed values between successive snapshots.
#[derive(Clone, Debug)]
pub struct SetDiffer<T> {
    previous: HashSet<T>,
    scratch: HashSet<T>,
}

impl<T> Default for SetDiffer<T> {
    fn default() -> Self {
        Self {
            previous: HashSet::new(),
            scratch: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> SetDiffer<T> {
    /// Creates a differ whose previous snapshot is empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs a complete snapshot against the previous one and remembers it.
    pub fn diff<I: IntoIterator<Item = T>>(&mut self, values: I) -> SetChanges<T> {
        let mut changes = SetChanges::new();
        self.diff_into(values, &mut changes);
        changes
    }

    /// Like [`diff`](Self::diff), writing into a caller-owned change set.
    pub fn diff_into<I: IntoIterator<Item = T>>(&mut self, values: I, changes: &mut SetChanges<T>) {
        let mut pass = self.begin();
        pass.feed(values);
        pass.finish_into(changes);
    }

    /// Starts a snapshot that is fed in several batches.
    pub fn begin(&mut self) -> SetDiffPass<'_, T> {
        self.scratch.clear();
        SetDiffPass {
            differ: self,
            added: Vec::new(),
        }
    }

    /// Returns the number of values in the remembered snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.previous.len()
    }

    /// Returns true if the remembered snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }

    /// Checks whether a value is in the remembered snapshot.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.previous.contains(value)
    }

    /// Forgets the remembered snapshot, so the next diff reports everything as added.
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

/// An in-progress snapshot. Dropping it without finishing leaves the differ unchanged.
#[derive(Debug)]
pub struct SetDiffPass<'a, T> {
    differ: &'a mut SetDiffer<T>,
    added: Vec<T>,
}

impl<T: Eq + Hash + Clone> SetDiffPass<'_, T> {
    /// Adds a batch of values to the snapshot.
    pub fn feed<I: IntoIterator<Item = T>>(&mut self, values: I) {
        let differ = &mut *self.differ;
        for value in values {
            if differ.previous.contains(&value) {
                differ.scratch.insert(value);
            } else if differ.scratch.insert(value.clone()) {
                self.added.push(value);
            }
        }
    }

    /// Returns the number of distinct values fed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.differ.scratch.len()
    }

    /// Returns true if nothing has been fed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.differ.scratch.is_empty()
    }

    /// Completes the snapshot and returns the changes.
    pub fn finish(self) -> SetChanges<T> {
        let mut changes = SetChanges::new();
        self.finish_into(&mut changes);
        changes
    }

    /// Completes the snapshot, writing into a caller-owned change set.
    pub fn finish_into(self, changes: &mut SetChanges<T>) {
        let differ = self.differ;
        changes.clear();
        changes.added = self.added;
        changes.removed.extend(
            differ
                .previous
                .iter()
                .filter(|v| !differ.scratch.contains(*v))
                .cloned(),
        );
        std::mem::swap(&mut differ.previous, &mut differ.scratch);
        differ.scratch.clear();
    }
}
