//! Engine abstraction shared by the gateway and its backends.

pub mod engine;

pub use engine::{EngineResponse, SearchEngine};
