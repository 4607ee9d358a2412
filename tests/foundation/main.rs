//! Integration tests for Layer 0: Foundation
//!
//! Tests for identifiers, versions, component metadata, and errors.

mod errors;
