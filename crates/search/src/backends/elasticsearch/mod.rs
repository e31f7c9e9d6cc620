//! Elasticsearch backend implementation.
//!
//! Provides [`ElasticsearchEngine`], the production [`SearchEngine`](crate::core::SearchEngine),
//! and the index schema (analyzers and per-kind mappings) applied when an
//! index is created.
//!
//! # Index Structure
//!
//! One index per document kind, named after the kind's declared display name
//! (`properties`, `managements`), optionally prefixed (`{prefix}_properties`).
//!
//! # Example
//!
//! ```ignore
//! use realty_search::backends::elasticsearch::{ElasticsearchConfig, ElasticsearchEngine};
//!
//! let config = ElasticsearchConfig {
//!     url: "http://localhost:9200".to_string(),
//!     ..Default::default()
//! };
//! let engine = ElasticsearchEngine::new(config)?;
//! ```

mod backend;
pub mod schema;

pub use backend::{ElasticsearchAuth, ElasticsearchConfig, ElasticsearchEngine};
pub use schema::IndexSettings;
