//! API route configuration.
//!
//! Defines all routes for the realty search REST API.

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get, post},
};
use realty_search::{ManagementDocument, PropertyDocument};
use tower_http::timeout::TimeoutLayer;

use crate::handlers::{self, DocumentRoute};
use crate::state::AppState;

/// Creates all REST API routes.
///
/// Bulk routes are not bounded by the request timeout: a bulk call waits for
/// the job's outcome, which its retry budget bounds. Every other route answers
/// 408 once `request_timeout` elapses.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Per kind (`property`, `management`)
/// - `POST /api/v1/{kind}/post` - Index one document
/// - `POST /api/v1/{kind}/post/bulk` - Index many documents
/// - `POST /api/v1/{kind}/find` - Search
/// - `DELETE /api/v1/{kind}/deleteall` - Delete the kind's index
pub fn create_routes(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config().request_timeout);

    let timed = Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/_readiness", get(handlers::health::readiness_handler))
        .nest("/api/v1/property", document_routes::<PropertyDocument>())
        .nest("/api/v1/management", document_routes::<ManagementDocument>())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    let bulk = Router::new()
        .route(
            "/api/v1/property/post/bulk",
            post(handlers::bulk_handler::<PropertyDocument>),
        )
        .route(
            "/api/v1/management/post/bulk",
            post(handlers::bulk_handler::<ManagementDocument>),
        );

    timed.merge(bulk).with_state(state)
}

fn document_routes<D: DocumentRoute>() -> Router<AppState> {
    Router::new()
        .route("/post", post(handlers::post_handler::<D>))
        .route("/find", post(handlers::find_handler::<D>))
        .route("/deleteall", delete(handlers::delete_all_handler::<D>))
}
