//! A recording in-memory search engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use realty_search::{BackendError, EngineResponse, SearchEngine};

/// A request the engine received.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    IndexExists(String),
    CreateIndex { index: String, body: Value },
    DeleteIndex(String),
    IndexDocument {
        index: String,
        id: Option<String>,
        document: Value,
    },
    Bulk { index: String, lines: Vec<Value> },
    Refresh(String),
    Search { index: String, body: Value },
}

/// A scripted engine outcome.
#[derive(Debug, Clone)]
pub enum Reply {
    /// The engine answered with this status and body.
    Status(u16, Value),
    /// The engine could not be reached.
    Unavailable,
    /// The request timed out.
    Timeout,
    /// Any other transport failure.
    Internal,
}

impl Reply {
    fn into_result(self) -> Result<EngineResponse, BackendError> {
        let backend_name = "memory".to_string();
        match self {
            Reply::Status(status, body) => Ok(EngineResponse::new(status, body)),
            Reply::Unavailable => Err(BackendError::Unavailable {
                backend_name,
                message: "connection refused".to_string(),
            }),
            Reply::Timeout => Err(BackendError::Timeout {
                backend_name,
                message: "request timed out".to_string(),
            }),
            Reply::Internal => Err(BackendError::Internal {
                backend_name,
                message: "transport failure".to_string(),
                source: None,
            }),
        }
    }
}

/// Which operation a scripted fault applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    IndexExists,
    CreateIndex,
    DeleteIndex,
    IndexDocument,
    Refresh,
}

/// In-memory engine that records every request.
///
/// Indexes are tracked by name only; searches answer with the reply set for
/// the index, or zero hits.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    indexes: Mutex<HashSet<String>>,
    requests: Mutex<Vec<Request>>,
    faults: Mutex<HashMap<Op, Reply>>,
    bulk_replies: Mutex<VecDeque<Reply>>,
    search_replies: Mutex<HashMap<String, Reply>>,
    bulk_delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    generated_ids: AtomicUsize,
}

impl MemoryEngine {
    /// Creates an engine with no indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing index.
    pub fn with_index(self, index: &str) -> Self {
        self.indexes.lock().insert(index.to_string());
        self
    }

    /// Makes every call of `op` answer with `reply`.
    pub fn fail(&self, op: Op, reply: Reply) {
        self.faults.lock().insert(op, reply);
    }

    /// Queues a reply for the next `_bulk` call; unscripted calls succeed.
    pub fn push_bulk_reply(&self, reply: Reply) {
        self.bulk_replies.lock().push_back(reply);
    }

    /// Sets the reply of every search against `index`.
    pub fn set_search_reply(&self, index: &str, reply: Reply) {
        self.search_replies.lock().insert(index.to_string(), reply);
    }

    /// Holds every `_bulk` call open for `delay`.
    pub fn set_bulk_delay(&self, delay: Duration) {
        *self.bulk_delay.lock() = Some(delay);
    }

    /// Returns true when the index exists.
    pub fn has_index(&self, index: &str) -> bool {
        self.indexes.lock().contains(index)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Creates issued so far.
    pub fn creates(&self) -> Vec<(String, Value)> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::CreateIndex { index, body } => Some((index, body)),
                _ => None,
            })
            .collect()
    }

    /// Searches issued so far.
    pub fn searches(&self) -> Vec<(String, Value)> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::Search { index, body } => Some((index, body)),
                _ => None,
            })
            .collect()
    }

    /// `_bulk` calls issued so far, as their action/source lines.
    pub fn bulk_calls(&self) -> Vec<Vec<Value>> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::Bulk { lines, .. } => Some(lines),
                _ => None,
            })
            .collect()
    }

    /// Refreshes issued so far.
    pub fn refreshes(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches!(r, Request::Refresh(_)))
            .count()
    }

    /// Highest number of concurrent `_bulk` calls seen.
    pub fn max_bulk_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, request: Request) {
        self.requests.lock().push(request);
    }

    fn fault(&self, op: Op) -> Option<Reply> {
        self.faults.lock().get(&op).cloned()
    }
}

/// Default `_bulk` reply: every item created.
pub fn bulk_ok(lines: &[Value]) -> Value {
    let items: Vec<Value> = lines
        .chunks(2)
        .map(|pair| json!({ "index": { "_id": pair[0]["index"]["_id"], "status": 201 } }))
        .collect();
    json!({ "took": 3, "errors": false, "items": items })
}

fn index_not_found(index: &str) -> Value {
    json!({
        "error": { "type": "index_not_found_exception", "index": index },
        "status": 404
    })
}

#[async_trait]
impl SearchEngine for MemoryEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        self.record(Request::IndexExists(index.to_string()));
        if let Some(reply) = self.fault(Op::IndexExists) {
            return reply.into_result().map(|r| r.is_success());
        }
        Ok(self.has_index(index))
    }

    async fn create_index(
        &self,
        index: &str,
        body: Value,
    ) -> Result<EngineResponse, BackendError> {
        self.record(Request::CreateIndex {
            index: index.to_string(),
            body,
        });
        if let Some(reply) = self.fault(Op::CreateIndex) {
            return reply.into_result();
        }

        if !self.indexes.lock().insert(index.to_string()) {
            return Ok(EngineResponse::new(
                400,
                json!({ "error": { "type": "resource_already_exists_exception" }, "status": 400 }),
            ));
        }
        Ok(EngineResponse::new(
            200,
            json!({ "acknowledged": true, "index": index }),
        ))
    }

    async fn delete_index(&self, index: &str) -> Result<EngineResponse, BackendError> {
        self.record(Request::DeleteIndex(index.to_string()));
        if let Some(reply) = self.fault(Op::DeleteIndex) {
            return reply.into_result();
        }

        if self.indexes.lock().remove(index) {
            Ok(EngineResponse::new(200, json!({ "acknowledged": true })))
        } else {
            Ok(EngineResponse::new(404, index_not_found(index)))
        }
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<EngineResponse, BackendError> {
        self.record(Request::IndexDocument {
            index: index.to_string(),
            id: id.map(str::to_string),
            document,
        });
        if let Some(reply) = self.fault(Op::IndexDocument) {
            return reply.into_result();
        }

        let id = match id {
            Some(id) => id.to_string(),
            None => format!(
                "generated-{}",
                self.generated_ids.fetch_add(1, Ordering::SeqCst)
            ),
        };
        Ok(EngineResponse::new(
            201,
            json!({ "_index": index, "_id": id, "result": "created" }),
        ))
    }

    async fn bulk(&self, index: &str, lines: Vec<Value>) -> Result<EngineResponse, BackendError> {
        self.record(Request::Bulk {
            index: index.to_string(),
            lines: lines.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = *self.bulk_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let scripted = self.bulk_replies.lock().pop_front();
        match scripted {
            Some(reply) => reply.into_result(),
            None => Ok(EngineResponse::new(200, bulk_ok(&lines))),
        }
    }

    async fn refresh(&self, index: &str) -> Result<EngineResponse, BackendError> {
        self.record(Request::Refresh(index.to_string()));
        if let Some(reply) = self.fault(Op::Refresh) {
            return reply.into_result();
        }
        Ok(EngineResponse::new(200, json!({ "_shards": { "failed": 0 } })))
    }

    async fn search(&self, index: &str, body: Value) -> Result<EngineResponse, BackendError> {
        self.record(Request::Search {
            index: index.to_string(),
            body,
        });

        let scripted = self.search_replies.lock().get(index).cloned();
        if let Some(reply) = scripted {
            return reply.into_result();
        }
        if !self.has_index(index) {
            return Ok(EngineResponse::new(404, index_not_found(index)));
        }
        Ok(EngineResponse::new(200, super::fixtures::hits_reply(1, vec![])))
    }
}
