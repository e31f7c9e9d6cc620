//! A document-storing stub engine.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use realty_search::{BackendError, EngineResponse, SearchEngine};

/// Keeps documents per index and answers every search with all of them.
///
/// Queries are not evaluated; the REST tests only check how envelopes are
/// produced and routed.
#[derive(Debug, Default)]
pub struct StubEngine {
    indexes: Mutex<BTreeMap<String, Vec<Value>>>,
    unreachable: AtomicBool,
    next_id: AtomicU64,
    bulk_delay: Mutex<Option<Duration>>,
    search_delay: Mutex<Option<Duration>>,
}

impl StubEngine {
    /// Creates an engine with no indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail as if the engine were down.
    pub fn go_down(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    /// Makes every later bulk call take `delay` before answering.
    pub fn set_bulk_delay(&self, delay: Duration) {
        *self.bulk_delay.lock() = Some(delay);
    }

    /// Makes every later search take `delay` before answering.
    pub fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.lock() = Some(delay);
    }

    /// Documents stored in `index`.
    pub fn documents(&self, index: &str) -> Vec<Value> {
        self.indexes.lock().get(index).cloned().unwrap_or_default()
    }

    /// Returns true when the index exists.
    pub fn has_index(&self, index: &str) -> bool {
        self.indexes.lock().contains_key(index)
    }

    fn check_reachable(&self) -> Result<(), BackendError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable {
                backend_name: "stub".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn store(&self, index: &str, id: Option<&str>, mut source: Value) -> String {
        let id = match id {
            Some(id) => id.to_string(),
            None => format!("auto-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
        };
        source["_stub_id"] = json!(id);
        self.indexes
            .lock()
            .entry(index.to_string())
            .or_default()
            .push(source);
        id
    }
}

fn index_not_found(index: &str) -> EngineResponse {
    EngineResponse::new(
        404,
        json!({
            "error": { "type": "index_not_found_exception", "index": index },
            "status": 404
        }),
    )
}

#[async_trait]
impl SearchEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        self.check_reachable()?;
        Ok(self.has_index(index))
    }

    async fn create_index(&self, index: &str, _body: Value) -> Result<EngineResponse, BackendError> {
        self.check_reachable()?;
        self.indexes.lock().entry(index.to_string()).or_default();
        Ok(EngineResponse::new(200, json!({ "acknowledged": true })))
    }

    async fn delete_index(&self, index: &str) -> Result<EngineResponse, BackendError> {
        self.check_reachable()?;
        match self.indexes.lock().remove(index) {
            Some(_) => Ok(EngineResponse::new(200, json!({ "acknowledged": true }))),
            None => Ok(index_not_found(index)),
        }
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<EngineResponse, BackendError> {
        self.check_reachable()?;
        let id = self.store(index, id, document);
        Ok(EngineResponse::new(
            201,
            json!({ "_index": index, "_id": id, "result": "created" }),
        ))
    }

    async fn bulk(&self, index: &str, lines: Vec<Value>) -> Result<EngineResponse, BackendError> {
        self.check_reachable()?;
        let delay = *self.bulk_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut items = Vec::new();
        for pair in lines.chunks(2) {
            let id = pair[0]["index"]["_id"].as_str();
            let stored = self.store(index, id, pair[1].clone());
            items.push(json!({ "index": { "_id": stored, "status": 201 } }));
        }
        Ok(EngineResponse::new(
            200,
            json!({ "took": 1, "errors": false, "items": items }),
        ))
    }

    async fn refresh(&self, _index: &str) -> Result<EngineResponse, BackendError> {
        self.check_reachable()?;
        Ok(EngineResponse::new(200, json!({ "_shards": { "failed": 0 } })))
    }

    async fn search(&self, index: &str, _body: Value) -> Result<EngineResponse, BackendError> {
        self.check_reachable()?;
        let delay = *self.search_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if !self.has_index(index) {
            return Ok(index_not_found(index));
        }

        let hits: Vec<Value> = self
            .documents(index)
            .into_iter()
            .map(|mut source| {
                let id = source["_stub_id"].take();
                if let Some(object) = source.as_object_mut() {
                    object.remove("_stub_id");
                }
                json!({ "_id": id, "_score": 1.0, "_source": source })
            })
            .collect();
        Ok(EngineResponse::new(
            200,
            json!({
                "took": 4,
                "timed_out": false,
                "hits": {
                    "total": { "value": hits.len(), "relation": "eq" },
                    "hits": hits
                }
            }),
        ))
    }
}
