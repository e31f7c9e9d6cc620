//! Reading search replies.

use serde_json::Value;

use crate::core::{EngineResponse, SearchEngine};
use crate::error::{BackendError, GatewayResult};
use crate::types::{DocumentKind, SearchPayload, fields};

/// Total, timing and hit sources of one search reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    /// Total matches (`hits.total.value`).
    pub total: u64,
    /// Engine-side execution time in milliseconds (`took`).
    pub took: u64,
    /// `_source` of every hit on the page.
    pub sources: Vec<Value>,
    /// `_id` of every hit on the page, aligned with `sources`.
    pub ids: Vec<String>,
}

impl SearchHits {
    /// Extracts hits from a search reply body.
    ///
    /// A hit whose source carries no `id` gets it back from `_id` when that
    /// is numeric. Every `_id` is kept as is in `ids`, engine-generated ones
    /// included.
    pub fn from_body(body: &Value) -> Self {
        let hits = &body["hits"];
        let total = match &hits["total"] {
            Value::Number(n) => n.as_u64().unwrap_or(0),
            other => other["value"].as_u64().unwrap_or(0),
        };

        let page = hits["hits"].as_array().map(Vec::as_slice).unwrap_or_default();
        let sources = page.iter().map(hit_source).collect();
        let ids = page.iter().map(hit_id).collect();

        Self {
            total,
            took: body["took"].as_u64().unwrap_or(0),
            sources,
            ids,
        }
    }

    /// Writes the count and hits into the side of `payload` that belongs to `kind`.
    pub fn apply_to(self, kind: DocumentKind, payload: &mut SearchPayload) -> GatewayResult<()> {
        match kind {
            DocumentKind::Property => {
                payload.property_count = self.total;
                payload.property_ids = self.ids;
                payload.properties = self
                    .sources
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?;
            }
            DocumentKind::Management => {
                payload.management_count = self.total;
                payload.management_ids = self.ids;
                payload.managements = self
                    .sources
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<_, _>>()?;
            }
        }
        Ok(())
    }
}

fn hit_source(hit: &Value) -> Value {
    let mut source = hit.get("_source").cloned().unwrap_or(Value::Null);
    if let Value::Object(map) = &mut source
        && !map.contains_key(fields::ID)
        && let Some(id) = hit["_id"].as_str().and_then(|id| id.parse::<i64>().ok())
    {
        map.insert(fields::ID.to_string(), Value::from(id));
    }
    source
}

fn hit_id(hit: &Value) -> String {
    match &hit["_id"] {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    }
}

/// Runs a search and reads its hits; a missing index reads as no hits.
pub(crate) async fn run_search(
    engine: &dyn SearchEngine,
    index: &str,
    body: Value,
) -> GatewayResult<SearchHits> {
    let response = engine.search(index, body).await?;

    if response.is_index_not_found() {
        tracing::debug!(index = %index, "Searched index does not exist yet");
        return Ok(SearchHits::default());
    }
    if !response.is_success() {
        return Err(status_error(engine.name(), index, &response).into());
    }

    Ok(SearchHits::from_body(&response.body))
}

fn status_error(backend_name: &str, index: &str, response: &EngineResponse) -> BackendError {
    let message = format!(
        "search on {} returned status {}: {}",
        index, response.status, response.body
    );
    match response.status {
        408 | 504 => BackendError::Timeout {
            backend_name: backend_name.to_string(),
            message,
        },
        502 | 503 => BackendError::Unavailable {
            backend_name: backend_name.to_string(),
            message,
        },
        _ => BackendError::Internal {
            backend_name: backend_name.to_string(),
            message,
            source: None,
        },
    }
}
