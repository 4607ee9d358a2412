//! Wrap-aware monotonic version counters.
//!
//! The store bumps a world-wide global version before every mutation and stamps
//! chunks with it. Versions wrap modulo 2^32, so ordering is decided by the sign
//! of the wrapping difference rather than by plain integer comparison.

use std::fmt;

/// A monotonic, wrapping version stamp.
///
/// `Version::ZERO` means "never observed" and is older than every version a store
/// hands out after its first mutation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Version(u32);

impl Version {
    /// The "never observed" version.
    pub const ZERO: Version = Version(0);

    /// The first version a freshly created store reports.
    pub const INITIAL: Version = Version(1);

    /// Wraps a raw counter value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the next version, skipping zero on wrap-around.
    #[must_use]
    pub const fn next(self) -> Self {
        let next = self.0.wrapping_add(1);
        if next == 0 { Self(1) } else { Self(next) }
    }

    /// Returns true if `self` was issued after `other`.
    ///
    /// Correct as long as the two versions are less than 2^31 increments apart.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn is_newer_than(self, other: Version) -> bool {
        (self.0.wrapping_sub(other.0) as i32) > 0
    }

    /// Returns true if something stamped `self` changed after a reader last saw `since`.
    ///
    /// A reader that has never looked (`since == ZERO`) sees every stamp as changed.
    #[must_use]
    pub const fn did_change(self, since: Version) -> bool {
        since.0 == 0 || self.is_newer_than(since)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
