//! HTTP request handlers.
//!
//! - [`documents`] - Post, bulk post, find and delete-all per document kind
//! - [`health`] - Health, liveness and readiness endpoints

pub mod documents;
pub mod health;

// Re-export handlers for convenience
pub use documents::{
    DocumentRoute, bulk_handler, delete_all_handler, find_handler, post_handler,
};
pub use health::health_handler;
