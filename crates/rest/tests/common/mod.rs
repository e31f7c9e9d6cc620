//! Common test utilities for REST API testing.
//!
//! - [`engine`] - A stub engine that stores documents
//! - [`harness`] - REST API test harness

#![allow(dead_code)]

pub mod engine;
pub mod harness;

pub use engine::StubEngine;
pub use harness::RestTestHarness;
