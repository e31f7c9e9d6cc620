//! REST API test harness.
//!
//! Provides a test server wired to a [`StubEngine`].

use std::sync::Arc;

use axum_test::TestServer;
use realty_search::{SearchEngine, SearchGateway};
use serde_json::Value;

use realty_rest::{ServerConfig, create_app_with_config};

use super::engine::StubEngine;

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() {
///     let harness = RestTestHarness::new();
///     let response = harness.server.get("/health").await;
///     response.assert_status_ok();
/// }
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The engine behind the gateway.
    pub engine: Arc<StubEngine>,
}

impl RestTestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with the given configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let engine = Arc::new(StubEngine::new());
        let shared: Arc<dyn SearchEngine> = engine.clone();
        let gateway =
            SearchGateway::new(shared, config.gateway_config()).expect("gateway construction");

        let app = create_app_with_config(gateway, config);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, engine }
    }

    /// Posts `body` to `path` and returns the JSON envelope, asserting HTTP 200.
    pub async fn post_json(&self, path: &str, body: &Value) -> Value {
        let response = self.server.post(path).json(body).await;
        response.assert_status_ok();
        response.json()
    }

    /// Sends a DELETE to `path` and returns the JSON envelope, asserting HTTP 200.
    pub async fn delete(&self, path: &str) -> Value {
        let response = self.server.delete(path).await;
        response.assert_status_ok();
        response.json()
    }
}
