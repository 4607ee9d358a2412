//! Integration tests for Layer 1: Storage
//!
//! Tests for the chunked world, versioning, and the chunk source interface.

mod entities;
