//! Realty Search Gateway
//!
//! This crate indexes property and management company records into
//! Elasticsearch and answers multi-field filtered searches over them. Every
//! operation returns a uniform [`Response`] envelope carrying an
//! [`ErrorCode`], a human-readable message and a typed payload.
//!
//! # Features
//!
//! - **Index lifecycle**: indexes are created on first write with the
//!   `standard_english`, `partial_text` and `full_text` analyzers and a
//!   mapping derived from each kind's field table
//! - **Bulk loading**: bounded parallelism, fixed back-off retries of only
//!   the failed items, refresh on completion
//! - **Filtered search**: fuzzy phrase matching plus optional city, state and
//!   street address clauses
//! - **Market cross-reference**: a search naming markets also returns the
//!   other kind's records in those markets
//!
//! # Architecture
//!
//! - [`types`] - Documents, filters and the result envelope
//! - [`error`] - Error types for gateway internals
//! - [`core`] - The [`SearchEngine`] seam
//! - [`backends`] - The Elasticsearch engine and index schema
//! - [`index`] - Index naming, lifecycle and bulk loading
//! - [`search`] - Query composition and the market lookup
//! - [`gateway`] - The [`SearchGateway`] operations
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use realty_search::backends::elasticsearch::{ElasticsearchConfig, ElasticsearchEngine};
//! use realty_search::types::{DocumentKind, FilterSpec, PropertyDocument};
//! use realty_search::{GatewayConfig, SearchGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ElasticsearchEngine::new(ElasticsearchConfig::default())?;
//! let gateway = SearchGateway::new(Arc::new(engine), GatewayConfig::default())?;
//!
//! let written = gateway
//!     .index(
//!         PropertyDocument {
//!             id: Some(1),
//!             name: "Maple Court".to_string(),
//!             market: "West".to_string(),
//!             ..Default::default()
//!         }
//!         .into(),
//!     )
//!     .await;
//! assert!(written.is_success());
//!
//! let found = gateway
//!     .search(
//!         &FilterSpec::new("Maple").with_market("West"),
//!         DocumentKind::Property,
//!     )
//!     .await;
//! println!("{} properties", found.payload.property_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod gateway;
pub mod index;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{BackendError, BulkError, GatewayError, GatewayResult, ValidationError};
pub use gateway::{GatewayConfig, SearchGateway};
pub use types::{
    Document, DocumentKind, ErrorCode, FilterSpec, IndexPayload, ManagementDocument,
    PropertyDocument, Response, SearchPayload, State,
};

// Re-export the engine seam
pub use crate::core::{EngineResponse, SearchEngine};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
