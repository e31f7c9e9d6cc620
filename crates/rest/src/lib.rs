//! # realty-rest - REST API for the realty search gateway
//!
//! This crate exposes the [`realty_search`] gateway over HTTP. Property and
//! management documents each get the same four routes: post, bulk post, find
//! and delete-all.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use realty_rest::{create_app_with_config, ServerConfig};
//! use realty_search::SearchGateway;
//! use realty_search::backends::elasticsearch::ElasticsearchEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let engine = ElasticsearchEngine::new(config.elasticsearch_config())?;
//!     let gateway = SearchGateway::new(Arc::new(engine), config.gateway_config())?;
//!
//!     let app = create_app_with_config(gateway, config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | index one | POST | `/api/v1/{property,management}/post` |
//! | index many | POST | `/api/v1/{property,management}/post/bulk` |
//! | search | POST | `/api/v1/{property,management}/find` |
//! | delete index | DELETE | `/api/v1/{property,management}/deleteall` |
//! | health | GET | `/health` |
//!
//! ## Responses
//!
//! Every API endpoint answers HTTP 200 with the gateway's envelope; the
//! envelope's `code` carries the outcome. A body that is not valid JSON for
//! the route answers with code 1003 (Bad request). Routes other than bulk
//! answer 408 when they outlast the request timeout; a bulk call always waits
//! for its job's outcome.
//!
//! ## Architecture
//!
//! - [`error`] - Errors raised before a request reaches the gateway
//! - [`config`] - Server configuration
//! - [`state`] - Application state (gateway, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use realty_search::SearchGateway;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Crates whose events follow the configured log level.
const LOG_TARGETS: [&str; 2] = ["realty_rest", "realty_search"];

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app(gateway: SearchGateway) -> Router {
    create_app_with_config(gateway, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Request tracing and the body limit cover every route, CORS too when
/// enabled. The request timeout is applied per route group in
/// [`routing::create_routes`].
pub fn create_app_with_config(gateway: SearchGateway, config: ServerConfig) -> Router {
    info!(
        engine = gateway.engine().name(),
        request_timeout_secs = config.request_timeout,
        cors = config.enable_cors,
        "Creating REST API server"
    );

    let cors = config.enable_cors.then(|| build_cors_layer(&config));
    let body_limit = DefaultBodyLimit::max(config.max_body_size);

    let router = routing::create_routes(AppState::new(Arc::new(gateway), config)).layer(body_limit);
    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

/// Parses a comma-separated allow-list; `*` means any value.
///
/// Entries that do not parse are skipped.
fn allow_list<T: FromStr>(value: &str) -> Option<Vec<T>> {
    if value.trim() == "*" {
        return None;
    }
    Some(
        value
            .split(',')
            .filter_map(|entry| entry.trim().parse().ok())
            .collect(),
    )
}

/// Builds the CORS layer from the configured origins, methods and headers.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new();

    let cors = match allow_list::<HeaderValue>(&config.cors_origins) {
        Some(origins) => cors.allow_origin(origins),
        None => cors.allow_origin(Any),
    };
    let cors = match allow_list::<Method>(&config.cors_methods) {
        Some(methods) => cors.allow_methods(methods),
        None => cors.allow_methods(Any),
    };
    match allow_list::<HeaderName>(&config.cors_headers) {
        Some(headers) => cors.allow_headers(headers),
        None => cors.allow_headers(Any),
    }
}

/// Filter directives used when `RUST_LOG` is not set.
fn default_log_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .chain(std::iter::once("tower_http=debug".to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `level`. Only the first call installs a subscriber.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directives(level)));

    if tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}
