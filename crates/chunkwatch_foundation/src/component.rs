//! Component type metadata.
//!
//! The store describes every registered component type with a [`ComponentInfo`].
//! The diffing engine only ever reads this metadata; it decides which types a
//! differ may be built over through [`ComponentInfo::can_watch_value`] and
//! [`ComponentInfo::can_watch_shared`].

use std::fmt;

/// Dense identifier of a registered component type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    /// Creates a component type ID from its registration index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the registration index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

/// Storage class of a component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Plain per-entity data stored in chunk columns.
    Data,
    /// A zero-sized marker with no stored value.
    Tag,
    /// One plain value shared by every entity of a chunk.
    Shared,
    /// Per-entity data owned outside chunk memory (not byte-comparable).
    Managed,
    /// A shared value owned outside chunk memory (not byte-comparable).
    ManagedShared,
}

impl ComponentKind {
    /// Returns true for kinds whose value lives on the chunk rather than per entity.
    #[must_use]
    pub const fn is_shared(self) -> bool {
        matches!(self, Self::Shared | Self::ManagedShared)
    }

    /// Returns true for kinds whose bytes are owned by the chunk.
    #[must_use]
    pub const fn is_unmanaged(self) -> bool {
        !matches!(self, Self::Managed | Self::ManagedShared)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Data => "data",
            Self::Tag => "tag",
            Self::Shared => "shared",
            Self::Managed => "managed",
            Self::ManagedShared => "managed shared",
        };
        f.write_str(name)
    }
}

/// Metadata describing a registered component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentInfo {
    /// The type's identifier.
    pub id: ComponentTypeId,
    /// Human-readable name, used in errors and logs.
    pub name: String,
    /// Size in bytes of one value.
    pub size: usize,
    /// Storage class.
    pub kind: ComponentKind,
    /// Whether values embed entity identifiers.
    pub has_entity_refs: bool,
}

impl ComponentInfo {
    /// Creates component metadata.
    #[must_use]
    pub fn new(id: ComponentTypeId, name: impl Into<String>, size: usize, kind: ComponentKind) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            kind,
            has_entity_refs: false,
        }
    }

    /// Marks the type as embedding entity identifiers.
    #[must_use]
    pub fn with_entity_refs(mut self) -> Self {
        self.has_entity_refs = true;
        self
    }

    /// Whether a per-entity value differ may watch this type.
    ///
    /// True only for unmanaged, non-zero-sized, non-shared types that hold no entity
    /// references.
    #[must_use]
    pub fn can_watch_value(&self) -> bool {
        self.kind == ComponentKind::Data && self.size > 0 && !self.has_entity_refs
    }

    /// Whether a shared grouping differ may watch this type.
    ///
    /// True only for unmanaged shared types.
    #[must_use]
    pub fn can_watch_shared(&self) -> bool {
        self.kind == ComponentKind::Shared
    }
}
