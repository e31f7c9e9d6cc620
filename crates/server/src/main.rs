//! Realty search gateway server.
//!
//! Serves property and management indexing and search over Elasticsearch.

use std::sync::Arc;

use clap::Parser;
use realty_rest::{ServerConfig, create_app_with_config, init_logging};
use realty_search::SearchGateway;
use realty_search::backends::elasticsearch::ElasticsearchEngine;
use tracing::info;

/// Builds the gateway over an Elasticsearch engine from the server configuration.
fn create_gateway(config: &ServerConfig) -> anyhow::Result<SearchGateway> {
    let es_config = config.elasticsearch_config();
    info!(
        url = %es_config.url,
        authenticated = es_config.auth.is_some(),
        "Initializing Elasticsearch engine"
    );

    let engine = ElasticsearchEngine::new(es_config)
        .map_err(|e| anyhow::anyhow!("Invalid Elasticsearch configuration: {}", e))?;
    let gateway = SearchGateway::new(Arc::new(engine), config.gateway_config())
        .map_err(|e| anyhow::anyhow!("Invalid gateway configuration: {}", e))?;

    Ok(gateway)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        index_prefix = %config.index_prefix,
        "Starting realty search server"
    );

    let gateway = create_gateway(&config)?;
    let app = create_app_with_config(gateway, config.clone());
    serve(app, &config).await
}
