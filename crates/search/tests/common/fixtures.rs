//! Document fixtures and canned engine replies.

use std::sync::Arc;

use serde_json::{Value, json};

use realty_search::{
    Document, GatewayConfig, ManagementDocument, PropertyDocument, SearchEngine, SearchGateway,
};

use super::engine::MemoryEngine;

/// A property in `market`.
pub fn property(id: i64, name: &str, market: &str) -> PropertyDocument {
    PropertyDocument {
        id: Some(id),
        name: name.to_string(),
        former_name: format!("Old {}", name),
        street_address: format!("{} Main St", id),
        city: "Austin".to_string(),
        market: market.to_string(),
        state: "TX".to_string(),
        latitude: Some("30.2672".to_string()),
        longitude: Some("-97.7431".to_string()),
    }
}

/// A management company in `market`.
pub fn management(id: i64, name: &str, market: &str) -> ManagementDocument {
    ManagementDocument {
        id: Some(id),
        name: name.to_string(),
        market: market.to_string(),
        state: "TX".to_string(),
    }
}

/// `count` properties with ids starting at 1.
pub fn properties(count: usize) -> Vec<Document> {
    (1..=count as i64)
        .map(|id| property(id, &format!("Property {}", id), "West").into())
        .collect()
}

/// A search reply whose total equals the number of sources.
pub fn hits_reply(took: u64, sources: Vec<Value>) -> Value {
    let total = sources.len() as u64;
    hits_reply_with_total(took, total, sources)
}

/// A search reply with an explicit total.
pub fn hits_reply_with_total(took: u64, total: u64, sources: Vec<Value>) -> Value {
    let hits: Vec<Value> = sources
        .into_iter()
        .map(|source| json!({ "_id": source["id"].to_string(), "_score": 1.0, "_source": source }))
        .collect();
    json!({
        "took": took,
        "timed_out": false,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "hits": hits
        }
    })
}

/// A gateway over `engine` with default configuration.
pub fn gateway(engine: &Arc<MemoryEngine>) -> SearchGateway {
    gateway_with(engine, GatewayConfig::default())
}

/// A gateway over `engine` with the given configuration.
pub fn gateway_with(engine: &Arc<MemoryEngine>, config: GatewayConfig) -> SearchGateway {
    let engine: Arc<dyn SearchEngine> = engine.clone();
    SearchGateway::new(engine, config).expect("gateway construction")
}
