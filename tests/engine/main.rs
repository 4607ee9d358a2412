//! Integration tests for Layer 2: Engine
//!
//! Tests for the set, entity, component and shared differs and event coalescing.

mod common;
mod entity_differ;
mod events;
mod set_differ;
mod unresolved;
