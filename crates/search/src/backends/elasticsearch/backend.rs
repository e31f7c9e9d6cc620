//! Elasticsearch client construction and the [`SearchEngine`] implementation.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::request::JsonBody;
use elasticsearch::http::response::Response as EsResponse;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts,
};
use elasticsearch::{BulkParts, Elasticsearch, IndexParts, SearchParts};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{EngineResponse, SearchEngine};
use crate::error::{BackendError, GatewayError, GatewayResult};

const BACKEND_NAME: &str = "elasticsearch";

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic login/password authentication.
    Basic {
        /// The login.
        username: String,
        /// The password.
        password: String,
    },
}

impl ElasticsearchAuth {
    /// Builds basic auth from optional credentials; no login means no auth.
    pub fn from_login(login: Option<&str>, password: Option<&str>) -> Option<Self> {
        match login.map(str::trim).filter(|l| !l.is_empty()) {
            Some(username) => Some(ElasticsearchAuth::Basic {
                username: username.to_string(),
                password: password.unwrap_or_default().to_string(),
            }),
            None => None,
        }
    }
}

/// Connection settings for the Elasticsearch engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Engine endpoint (default: `http://localhost:9200`).
    #[serde(default = "default_url")]
    pub url: String,

    /// Optional authentication; absent means an unauthenticated connection.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth: None,
            request_timeout_ms: default_request_timeout_ms(),
            disable_certificate_validation: false,
        }
    }
}

/// [`SearchEngine`] over the official Elasticsearch client.
///
/// The client is built once and shared; it is never reconfigured per request.
pub struct ElasticsearchEngine {
    client: Elasticsearch,
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchEngine")
            .field("url", &self.config.url)
            .field("authenticated", &self.config.auth.is_some())
            .finish_non_exhaustive()
    }
}

impl ElasticsearchEngine {
    /// Creates an engine with the given configuration. Does not connect.
    pub fn new(config: ElasticsearchConfig) -> GatewayResult<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &ElasticsearchConfig) -> GatewayResult<Elasticsearch> {
        let parsed_url: elasticsearch::http::Url =
            config.url.parse().map_err(|e| GatewayError::Configuration {
                message: format!("invalid Elasticsearch URL '{}': {}", config.url, e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ElasticsearchAuth::Basic { username, password }) = &config.auth {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }

        let transport = builder.build().map_err(|e| GatewayError::Configuration {
            message: format!("failed to build Elasticsearch transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }
}

/// Classifies a transport failure.
fn transport_error(operation: &str, err: elasticsearch::Error) -> BackendError {
    let message = format!("{} failed: {}", operation, err);
    if err.is_timeout() {
        BackendError::Timeout {
            backend_name: BACKEND_NAME.to_string(),
            message,
        }
    } else if err.status_code().is_none() {
        BackendError::Unavailable {
            backend_name: BACKEND_NAME.to_string(),
            message,
        }
    } else {
        BackendError::Internal {
            backend_name: BACKEND_NAME.to_string(),
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// Reads a HEAD index reply: only 404 means absent.
fn exists_from_status(status: u16) -> Result<bool, BackendError> {
    if (200..300).contains(&status) {
        return Ok(true);
    }
    let message = format!("index exists check returned status {}", status);
    match status {
        404 => Ok(false),
        408 | 504 => Err(BackendError::Timeout {
            backend_name: BACKEND_NAME.to_string(),
            message,
        }),
        502 | 503 => Err(BackendError::Unavailable {
            backend_name: BACKEND_NAME.to_string(),
            message,
        }),
        _ => Err(BackendError::Internal {
            backend_name: BACKEND_NAME.to_string(),
            message,
            source: None,
        }),
    }
}

/// Reads status and body; non-JSON bodies are kept as a JSON string.
async fn read_response(
    operation: &str,
    response: EsResponse,
) -> Result<EngineResponse, BackendError> {
    let status = response.status_code().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(operation, e))?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok(EngineResponse::new(status, body))
}

#[async_trait]
impl SearchEngine for ElasticsearchEngine {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| transport_error("index exists check", e))?;
        exists_from_status(response.status_code().as_u16())
    }

    async fn create_index(
        &self,
        index: &str,
        body: Value,
    ) -> Result<EngineResponse, BackendError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error("create index", e))?;
        read_response("create index", response).await
    }

    async fn delete_index(&self, index: &str) -> Result<EngineResponse, BackendError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| transport_error("delete index", e))?;
        read_response("delete index", response).await
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<EngineResponse, BackendError> {
        let parts = match id {
            Some(id) => IndexParts::IndexId(index, id),
            None => IndexParts::Index(index),
        };
        let response = self
            .client
            .index(parts)
            .body(document)
            .send()
            .await
            .map_err(|e| transport_error("index document", e))?;
        read_response("index document", response).await
    }

    async fn bulk(&self, index: &str, lines: Vec<Value>) -> Result<EngineResponse, BackendError> {
        let body: Vec<JsonBody<Value>> = lines.into_iter().map(JsonBody::new).collect();
        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error("bulk", e))?;
        read_response("bulk", response).await
    }

    async fn refresh(&self, index: &str) -> Result<EngineResponse, BackendError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| transport_error("refresh", e))?;
        read_response("refresh", response).await
    }

    async fn search(&self, index: &str, body: Value) -> Result<EngineResponse, BackendError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error("search", e))?;
        read_response("search", response).await
    }
}
