//! Health check endpoint handlers.
//!
//! Provides health, liveness and readiness endpoints for monitoring and load
//! balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use realty_search::DocumentKind;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Reports the process as healthy without contacting the engine.
///
/// # HTTP Request
///
/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Response {
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "engine": state.gateway().engine().name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for a liveness probe.
///
/// # HTTP Request
///
/// `GET /_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for a readiness probe.
///
/// Asks the engine whether the property index exists; any answer counts as
/// ready, a transport failure does not.
///
/// # HTTP Request
///
/// `GET /_readiness`
///
/// # Response
///
/// - `200 OK` - The engine answered
/// - `503 Service Unavailable` - The engine could not be reached
pub async fn readiness_handler(State(state): State<AppState>) -> RestResult<Response> {
    debug!("Processing readiness check request");

    let gateway = state.gateway();
    let index = gateway
        .index_names()
        .resolve(DocumentKind::Property)
        .map_err(|e| RestError::Unavailable {
            message: e.to_string(),
        })?;

    let exists = gateway.engine().index_exists(index).await.map_err(|e| {
        warn!(error = %e, "Readiness check failed");
        RestError::Unavailable {
            message: e.to_string(),
        }
    })?;

    let response = serde_json::json!({
        "status": "ready",
        "engine": gateway.engine().name(),
        "checks": {
            "engine": "ok",
            "propertyIndex": exists
        }
    });

    Ok((StatusCode::OK, Json(response)).into_response())
}
