//! Test infrastructure for the search gateway.
//!
//! Provides an in-memory [`SearchEngine`](realty_search::SearchEngine) that
//! records every request and can be scripted to fail, plus document fixtures.

#![allow(dead_code)]

pub mod engine;
pub mod fixtures;

// Re-export commonly used items
pub use engine::*;
pub use fixtures::*;
