//! Error types for the search gateway.
//!
//! Gateway operations never surface these errors to their callers: every
//! public operation converts them into a [`Response`](crate::types::Response)
//! carrying an [`ErrorCode`](crate::types::ErrorCode). They exist so the
//! internals can use `?` and so the conversion to a code happens in one place.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::types::ErrorCode;

/// The primary error type for gateway internals.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Startup-time misconfiguration (e.g. a document kind without an index name).
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Caller input is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The search engine failed or could not be reached.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A document or response could not be (de)serialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

/// Errors caused by invalid caller input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A bulk request carried no documents.
    #[error("bulk request contains no documents")]
    EmptyBatch,

    /// A bulk request mixed document kinds.
    #[error("bulk request mixes document kinds: expected {expected}, found {found}")]
    MixedKinds { expected: String, found: String },
}

/// Errors originating from the search engine.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The engine is unreachable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The engine did not answer in time.
    #[error("request to {backend_name} timed out: {message}")]
    Timeout {
        backend_name: String,
        message: String,
    },

    /// Any other engine failure.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Terminal failures of a bulk job.
#[derive(Error, Debug)]
pub enum BulkError {
    /// A document could not be turned into a bulk line; nothing was sent.
    #[error("document at position {position} could not be serialized: {message}")]
    Serialization { position: usize, message: String },

    /// A batch kept failing with retryable errors until the retry budget ran out.
    #[error("batch {batch} gave up after {retries} retries: {message}")]
    RetriesExhausted {
        batch: usize,
        retries: u32,
        message: String,
    },

    /// The engine rejected a request or a document with a non-retryable error.
    #[error("batch {batch} rejected (status {status}): {reason}")]
    Rejected {
        batch: usize,
        status: u16,
        reason: String,
    },

    /// Every batch was written but the final refresh failed.
    #[error("refresh of {index} after bulk failed: {message}")]
    Refresh { index: String, message: String },
}

impl BulkError {
    /// Returns true when the job failed before any batch was transmitted.
    pub fn before_transmission(&self) -> bool {
        matches!(self, BulkError::Serialization { .. })
    }
}

/// Result alias for gateway internals.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<&GatewayError> for ErrorCode {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::Validation(_) => ErrorCode::BadRequest,
            GatewayError::Backend(BackendError::Timeout { .. }) => ErrorCode::Timeout,
            GatewayError::Backend(BackendError::Unavailable { .. }) => {
                ErrorCode::ServiceUnavailable
            }
            GatewayError::Backend(BackendError::Internal { .. })
            | GatewayError::Configuration { .. }
            | GatewayError::Serialization { .. } => ErrorCode::InternalError,
        }
    }
}
