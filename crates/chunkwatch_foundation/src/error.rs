//! Error types for chunkwatch.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::component::{ComponentKind, ComponentTypeId};
use crate::entity::EntityId;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for chunkwatch operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates an unknown component type error.
    #[must_use]
    pub fn unknown_component(component: ComponentTypeId) -> Self {
        Self::new(ErrorKind::UnknownComponent(component))
    }

    /// Creates a component not found error.
    #[must_use]
    pub fn component_not_found(entity: EntityId, component: impl Into<String>) -> Self {
        Self::new(ErrorKind::ComponentNotFound {
            entity,
            component: component.into(),
        })
    }

    /// Creates a size mismatch error.
    #[must_use]
    pub fn size_mismatch(component: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::SizeMismatch {
            component: component.into(),
            expected,
            actual,
        })
    }

    /// Creates a wrong kind error.
    #[must_use]
    pub fn wrong_kind(component: impl Into<String>, expected: ComponentKind, actual: ComponentKind) -> Self {
        Self::new(ErrorKind::WrongKind {
            component: component.into(),
            expected,
            actual,
        })
    }

    /// Creates an error for a component type no differ may watch.
    #[must_use]
    pub fn cannot_watch(component: impl Into<String>, reason: &'static str) -> Self {
        Self::new(ErrorKind::CannotWatch {
            component: component.into(),
            reason,
        })
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity was not found in storage.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity reference is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Component type was never registered.
    #[error("unknown component type: {0:?}")]
    UnknownComponent(ComponentTypeId),

    /// A component type with this name already exists.
    #[error("component already registered: {0}")]
    DuplicateComponent(String),

    /// Component not present on entity.
    #[error("component not found: {component} on entity {entity:?}")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: EntityId,
        /// The component name that was not found.
        component: String,
    },

    /// Value size does not match the registered component size.
    #[error("size mismatch for {component}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// The component being written.
        component: String,
        /// The registered size.
        expected: usize,
        /// The size of the supplied value.
        actual: usize,
    },

    /// Operation does not apply to this component's storage class.
    #[error("wrong component kind for {component}: expected {expected}, got {actual}")]
    WrongKind {
        /// The component being accessed.
        component: String,
        /// The kind the operation requires.
        expected: ComponentKind,
        /// The registered kind.
        actual: ComponentKind,
    },

    /// Component type fails the watchability predicate for the requested differ.
    #[error("cannot watch {component}: {reason}")]
    CannotWatch {
        /// The component name.
        component: String,
        /// Why the type was rejected.
        reason: &'static str,
    },

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed.
    pub operation: Option<String>,
    /// The entity involved, if any.
    pub entity: Option<EntityId>,
    /// Chain of enclosing operations, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the entity involved.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "during {operation}")?;
        }
        if let Some(entity) = self.entity {
            write!(f, " on {entity:?}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
