//! The search engine seam.
//!
//! The gateway only ever talks to a [`SearchEngine`]. The production
//! implementation is [`ElasticsearchEngine`](crate::backends::elasticsearch::ElasticsearchEngine);
//! tests substitute an in-memory engine that records every request.

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;

/// A raw engine reply: HTTP status plus the parsed JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body; a JSON string when the body was not JSON.
    pub body: Value,
}

impl EngineResponse {
    /// Creates a response.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error.type` reported by the engine, if any.
    pub fn error_type(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|e| e.get("type"))
            .and_then(|t| t.as_str())
    }

    /// Returns true when the engine reported a missing index.
    pub fn is_index_not_found(&self) -> bool {
        self.status == 404 && self.error_type() == Some("index_not_found_exception")
    }

    /// Returns true when the engine refused to create an index that already exists.
    pub fn is_already_exists(&self) -> bool {
        self.error_type() == Some("resource_already_exists_exception")
    }
}

/// Operations the gateway needs from a document search engine.
///
/// Implementations report transport-level failures as [`BackendError`] and
/// return every reply the engine produced, successful or not, as an
/// [`EngineResponse`]. Interpreting statuses is the caller's job.
#[async_trait]
pub trait SearchEngine: Send + Sync + Debug {
    /// Short engine name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Checks whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, BackendError>;

    /// Creates an index with the given settings and mappings.
    async fn create_index(
        &self,
        index: &str,
        body: Value,
    ) -> Result<EngineResponse, BackendError>;

    /// Deletes an index and every document in it.
    async fn delete_index(&self, index: &str) -> Result<EngineResponse, BackendError>;

    /// Writes one document, under `id` when given.
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<EngineResponse, BackendError>;

    /// Sends one `_bulk` request made of alternating action and source lines.
    async fn bulk(&self, index: &str, lines: Vec<Value>) -> Result<EngineResponse, BackendError>;

    /// Makes recent writes visible to search.
    async fn refresh(&self, index: &str) -> Result<EngineResponse, BackendError>;

    /// Runs a search request body against an index.
    async fn search(&self, index: &str, body: Value) -> Result<EngineResponse, BackendError>;
}
