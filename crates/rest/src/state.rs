//! Application state for the realty search REST API.
//!
//! The shared state handed to every handler: the gateway and the server
//! configuration.

use std::sync::Arc;

use realty_search::SearchGateway;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust,ignore
/// use realty_rest::{AppState, ServerConfig};
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(gateway), ServerConfig::default());
/// ```
pub struct AppState {
    /// The indexing and search gateway.
    gateway: Arc<SearchGateway>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since SearchGateway is shared through Arc
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            config: Arc::clone(&self.config),
        }
    }
}

impl AppState {
    /// Creates a new AppState with the given gateway and configuration.
    pub fn new(gateway: Arc<SearchGateway>, config: ServerConfig) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the gateway.
    pub fn gateway(&self) -> &SearchGateway {
        &self.gateway
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
