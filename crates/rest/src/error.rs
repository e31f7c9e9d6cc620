//! Error types for the realty search REST API.
//!
//! Gateway operations never fail; they answer with an envelope. The errors
//! here cover what happens before a request reaches the gateway.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | Body |
//! |-------|-------------|------|
//! | BadRequest | 200 | envelope with code 1003 (Bad request) |
//! | Unavailable | 503 | `{"status": "unavailable", "reason": ...}` |

use std::fmt;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use realty_search::{ErrorCode, Response as Envelope};
use serde_json::Value;

/// The error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// The request body could not be read as the expected JSON.
    BadRequest {
        /// What was wrong with the body.
        message: String,
    },

    /// The search engine is not reachable.
    Unavailable {
        /// Why the engine is considered unavailable.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unavailable { message } => write!(f, "Unavailable: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        match self {
            // the envelope code is the status carrier, so malformed bodies still answer 200
            RestError::BadRequest { message } => {
                tracing::warn!(reason = %message, "Rejected request body");
                let envelope: Envelope<Value> = Envelope::new(ErrorCode::BadRequest, Value::Null);
                (StatusCode::OK, Json(envelope)).into_response()
            }
            RestError::Unavailable { message } => {
                let body = serde_json::json!({
                    "status": "unavailable",
                    "reason": message,
                });
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
