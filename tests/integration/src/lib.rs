//! Integration test utilities for the Chirpy auth core
//!
//! Wires the real services and extractors over the in-memory store, so the
//! end-to-end flows run without a database.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
