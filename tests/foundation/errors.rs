//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use chunkwatch_foundation::{ComponentKind, ComponentTypeId, EntityId, Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_entity_not_found() {
    let err = Error::entity_not_found(EntityId::new(42, 1));
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
    assert!(format!("{err}").contains("42v1"));
}

#[test]
fn error_stale_entity() {
    let err = Error::stale_entity(EntityId::new(3, 5));
    assert!(matches!(err.kind, ErrorKind::StaleEntity(_)));
    assert!(format!("{err}").contains("stale"));
}

#[test]
fn error_unknown_component() {
    let err = Error::unknown_component(ComponentTypeId::new(9));
    assert!(matches!(err.kind, ErrorKind::UnknownComponent(_)));
}

#[test]
fn error_size_mismatch() {
    let err = Error::size_mismatch("position", 8, 3);
    let msg = format!("{err}");
    assert!(msg.contains("position"));
    assert!(msg.contains('8'));
    assert!(msg.contains('3'));
}

#[test]
fn error_wrong_kind() {
    let err = Error::wrong_kind("team", ComponentKind::Data, ComponentKind::Shared);
    assert_eq!(
        format!("{err}"),
        "wrong component kind for team: expected data, got shared"
    );
}

#[test]
fn error_cannot_watch() {
    let err = Error::cannot_watch("owner", "values contain entity references");
    assert!(matches!(
        err.kind,
        ErrorKind::CannotWatch { reason: "values contain entity references", .. }
    ));
    assert!(format!("{err}").starts_with("cannot watch owner"));
}

#[test]
fn error_invalid_config() {
    let err = Error::invalid_config("chunk capacity must be at least 1");
    assert!(matches!(err.kind, ErrorKind::InvalidConfig(_)));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_with_context() {
    let context = ErrorContext::new()
        .with_operation("destroy")
        .with_entity(EntityId::new(5, 2));
    let err = Error::stale_entity(EntityId::new(5, 2)).with_context(context);

    let context = err.context.unwrap();
    assert_eq!(context.to_string(), "during destroy on EntityId(5v2)");
}

#[test]
fn context_frames() {
    let context = ErrorContext::new()
        .with_operation("spawn")
        .with_frame("tick 4")
        .with_frame("editor sync");
    assert_eq!(context.stack.len(), 2);
    assert!(context.to_string().contains("  in editor sync"));
}
