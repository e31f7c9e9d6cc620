//! Server configuration for the realty search REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REALTY_SERVER_PORT` | 8080 | Server port |
//! | `REALTY_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `REALTY_LOG_LEVEL` | info | Log level |
//! | `REALTY_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `REALTY_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `REALTY_ENABLE_CORS` | true | Enable CORS |
//! | `REALTY_CORS_ORIGINS` | * | Allowed origins |
//! | `REALTY_CORS_METHODS` | GET,POST,DELETE,OPTIONS | Allowed methods |
//! | `REALTY_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `REALTY_ELASTICSEARCH_URL` | http://localhost:9200 | Engine endpoint |
//! | `REALTY_ELASTICSEARCH_LOGIN` | | Engine login (no login, no auth) |
//! | `REALTY_ELASTICSEARCH_PASSWORD` | | Engine password |
//! | `REALTY_ELASTICSEARCH_TIMEOUT_MS` | 30000 | Engine request timeout |
//! | `REALTY_INDEX_PREFIX` | | Prefix prepended to index names |
//! | `REALTY_BULK_MAX_RETRIES` | 23 | Bulk retries per batch |
//! | `REALTY_BULK_BACKOFF` | 30s | Fixed back-off between bulk retries |
//! | `REALTY_BULK_PARALLELISM` | 4 | Concurrent bulk batches |
//! | `REALTY_BULK_BATCH_SIZE` | 1000 | Documents per bulk batch |
//!
//! # Example
//!
//! ```rust
//! use realty_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     index_prefix: "staging".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.gateway_config().index_prefix, "staging");
//! ```

use std::time::Duration;

use clap::Parser;
use realty_search::GatewayConfig;
use realty_search::backends::elasticsearch::{ElasticsearchAuth, ElasticsearchConfig};
use realty_search::index::BulkOptions;

/// Server configuration for the realty search REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "realty")]
#[command(about = "Property and management search gateway")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "REALTY_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "REALTY_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "REALTY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "REALTY_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "REALTY_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "REALTY_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "REALTY_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "REALTY_CORS_METHODS", default_value = "GET,POST,DELETE,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "REALTY_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Elasticsearch endpoint.
    #[arg(long, env = "REALTY_ELASTICSEARCH_URL", default_value = "http://localhost:9200")]
    pub elasticsearch_url: String,

    /// Elasticsearch login. Without one the connection is unauthenticated.
    #[arg(long, env = "REALTY_ELASTICSEARCH_LOGIN")]
    pub elasticsearch_login: Option<String>,

    /// Elasticsearch password.
    #[arg(long, env = "REALTY_ELASTICSEARCH_PASSWORD", hide_env_values = true)]
    pub elasticsearch_password: Option<String>,

    /// Elasticsearch request timeout in milliseconds.
    #[arg(long, env = "REALTY_ELASTICSEARCH_TIMEOUT_MS", default_value = "30000")]
    pub elasticsearch_timeout_ms: u64,

    /// Prefix prepended to every index name.
    #[arg(long, env = "REALTY_INDEX_PREFIX", default_value = "")]
    pub index_prefix: String,

    /// Retries per bulk batch before the job fails.
    #[arg(long, env = "REALTY_BULK_MAX_RETRIES", default_value = "23")]
    pub bulk_max_retries: u32,

    /// Fixed back-off between bulk retries (e.g. `30s`, `500ms`).
    #[arg(long, env = "REALTY_BULK_BACKOFF", default_value = "30s", value_parser = humantime::parse_duration)]
    pub bulk_backoff: Duration,

    /// Bulk batches in flight at once.
    #[arg(long, env = "REALTY_BULK_PARALLELISM", default_value = "4")]
    pub bulk_parallelism: usize,

    /// Documents per bulk batch.
    #[arg(long, env = "REALTY_BULK_BATCH_SIZE", default_value = "1000")]
    pub bulk_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let bulk = BulkOptions::default();
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            elasticsearch_url: "http://localhost:9200".to_string(),
            elasticsearch_login: None,
            elasticsearch_password: None,
            elasticsearch_timeout_ms: 30000,
            index_prefix: String::new(),
            bulk_max_retries: bulk.max_retries,
            bulk_backoff: bulk.backoff,
            bulk_parallelism: bulk.max_degree_of_parallelism,
            bulk_batch_size: bulk.batch_size,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Falls back to defaults when the environment does not parse.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection settings for the Elasticsearch engine.
    pub fn elasticsearch_config(&self) -> ElasticsearchConfig {
        ElasticsearchConfig {
            url: self.elasticsearch_url.clone(),
            auth: ElasticsearchAuth::from_login(
                self.elasticsearch_login.as_deref(),
                self.elasticsearch_password.as_deref(),
            ),
            request_timeout_ms: self.elasticsearch_timeout_ms,
            ..Default::default()
        }
    }

    /// Gateway settings: index prefix and bulk tuning.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            index_prefix: self.index_prefix.clone(),
            bulk: BulkOptions {
                max_retries: self.bulk_max_retries,
                backoff: self.bulk_backoff,
                max_degree_of_parallelism: self.bulk_parallelism,
                batch_size: self.bulk_batch_size,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.elasticsearch_url.trim().is_empty() {
            errors.push("Elasticsearch URL cannot be empty".to_string());
        }

        if self.elasticsearch_timeout_ms == 0 {
            errors.push("Elasticsearch timeout cannot be 0".to_string());
        }

        if self.elasticsearch_password.is_some() && self.elasticsearch_login.is_none() {
            errors.push("Elasticsearch password given without a login".to_string());
        }

        if self.bulk_parallelism == 0 {
            errors.push("Bulk parallelism cannot be 0".to_string());
        }

        if self.bulk_batch_size == 0 {
            errors.push("Bulk batch size cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and a short bulk back-off.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            bulk_max_retries: 2,
            bulk_backoff: Duration::from_millis(10),
            ..Default::default()
        }
    }
}
