//! Bulk loading with bounded parallelism and fixed back-off retries.
//!
//! A bulk job splits its documents into batches, keeps at most
//! `max_degree_of_parallelism` batches in flight, and retries only the items
//! that failed with a retryable status. The job runs on its own task and
//! reports its terminal outcome through a oneshot channel, so a caller can
//! block on the whole job (including every retry) without holding a worker.

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::core::SearchEngine;
use crate::error::BulkError;
use crate::types::Document;

/// HTTP statuses worth retrying, for a whole request or a single item.
const RETRYABLE_STATUSES: &[u16] = &[429, 502, 503, 504];

/// Bulk job policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkOptions {
    /// Maximum retries per batch (default: 23).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between retries (default: 30s).
    #[serde(with = "humantime_serde", default = "default_backoff")]
    pub backoff: Duration,

    /// Refresh the index once every batch succeeded (default: true).
    #[serde(default = "default_refresh_on_completed")]
    pub refresh_on_completed: bool,

    /// Batches in flight at once (default: 4).
    #[serde(default = "default_max_degree_of_parallelism")]
    pub max_degree_of_parallelism: usize,

    /// Documents per `_bulk` request (default: 1000).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_max_retries() -> u32 {
    23
}

fn default_backoff() -> Duration {
    Duration::from_secs(30)
}

fn default_refresh_on_completed() -> bool {
    true
}

fn default_max_degree_of_parallelism() -> usize {
    4
}

fn default_batch_size() -> usize {
    1000
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff: default_backoff(),
            refresh_on_completed: default_refresh_on_completed(),
            max_degree_of_parallelism: default_max_degree_of_parallelism(),
            batch_size: default_batch_size(),
        }
    }
}

/// Outcome of a successful bulk job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSummary {
    /// Documents written.
    pub documents: usize,
    /// `_bulk` batches the documents were split into.
    pub batches: usize,
    /// Retries spent across all batches.
    pub retries: u32,
}

#[derive(Debug, Clone)]
struct BulkItem {
    id: Option<String>,
    source: Value,
}

/// Runs bulk jobs against one engine.
#[derive(Debug, Clone)]
pub struct BulkLoader {
    engine: Arc<dyn SearchEngine>,
    options: BulkOptions,
}

impl BulkLoader {
    /// Creates a loader.
    pub fn new(engine: Arc<dyn SearchEngine>, options: BulkOptions) -> Self {
        Self { engine, options }
    }

    /// Returns the loader's policy.
    pub fn options(&self) -> &BulkOptions {
        &self.options
    }

    /// Starts a job on its own task; the receiver yields its terminal outcome.
    pub fn start(
        &self,
        index: String,
        documents: Vec<Document>,
    ) -> oneshot::Receiver<Result<BulkSummary, BulkError>> {
        let (tx, rx) = oneshot::channel();
        let loader = self.clone();

        tokio::spawn(async move {
            let outcome = loader.run(&index, &documents).await;
            if tx.send(outcome).is_err() {
                tracing::warn!(index = %index, "Bulk job finished after its caller went away");
            }
        });

        rx
    }

    /// Runs a job to completion.
    pub async fn run(
        &self,
        index: &str,
        documents: &[Document],
    ) -> Result<BulkSummary, BulkError> {
        let items = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| {
                doc.to_source()
                    .map(|source| BulkItem {
                        id: doc.id(),
                        source,
                    })
                    .map_err(|e| BulkError::Serialization {
                        position,
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let batches: Vec<Vec<BulkItem>> = items
            .chunks(self.options.batch_size.max(1))
            .map(<[BulkItem]>::to_vec)
            .collect();
        let batch_count = batches.len();

        tracing::debug!(
            index = %index,
            documents = items.len(),
            batches = batch_count,
            parallelism = self.options.max_degree_of_parallelism,
            "Starting bulk job"
        );

        let retries = stream::iter(batches.into_iter().enumerate())
            .map(|(batch, items)| self.send_batch(index, batch, items))
            .buffer_unordered(self.options.max_degree_of_parallelism.max(1))
            .try_fold(0u32, |total, retries| async move { Ok(total + retries) })
            .await?;

        if self.options.refresh_on_completed {
            self.refresh(index).await?;
        }

        Ok(BulkSummary {
            documents: items.len(),
            batches: batch_count,
            retries,
        })
    }

    /// Sends one batch, retrying failed items; returns the retries spent.
    async fn send_batch(
        &self,
        index: &str,
        batch: usize,
        items: Vec<BulkItem>,
    ) -> Result<u32, BulkError> {
        let mut pending = items;
        let mut attempt = 0u32;

        loop {
            let lines = bulk_lines(&pending);
            let retry_reason = match self.engine.bulk(index, lines).await {
                Err(e) => e.to_string(),
                Ok(resp) if RETRYABLE_STATUSES.contains(&resp.status) => {
                    format!("bulk request returned status {}", resp.status)
                }
                Ok(resp) if !resp.is_success() => {
                    return Err(BulkError::Rejected {
                        batch,
                        status: resp.status,
                        reason: resp.body.to_string(),
                    });
                }
                Ok(resp) => {
                    let retry = retryable_items(batch, resp.status, &resp.body, &pending)?;
                    if retry.is_empty() {
                        return Ok(attempt);
                    }
                    let reason = format!("{} of {} items throttled", retry.len(), pending.len());
                    pending = retry;
                    reason
                }
            };

            if attempt >= self.options.max_retries {
                return Err(BulkError::RetriesExhausted {
                    batch,
                    retries: attempt,
                    message: retry_reason,
                });
            }
            attempt += 1;

            tracing::warn!(
                index = %index,
                batch,
                attempt,
                max_retries = self.options.max_retries,
                reason = %retry_reason,
                "Retrying bulk batch"
            );
            tokio::time::sleep(self.options.backoff).await;
        }
    }

    async fn refresh(&self, index: &str) -> Result<(), BulkError> {
        match self.engine.refresh(index).await {
            Ok(resp) if resp.is_success() => Ok(()),
            Ok(resp) => Err(BulkError::Refresh {
                index: index.to_string(),
                message: format!("status {}: {}", resp.status, resp.body),
            }),
            Err(e) => Err(BulkError::Refresh {
                index: index.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Alternating action and source lines for a `_bulk` request.
fn bulk_lines(items: &[BulkItem]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(items.len() * 2);
    for item in items {
        let action = match &item.id {
            Some(id) => json!({ "index": { "_id": id } }),
            None => json!({ "index": {} }),
        };
        lines.push(action);
        lines.push(item.source.clone());
    }
    lines
}

/// Picks the items to resend from a `_bulk` reply.
///
/// Items come back in request order. A non-retryable item failure fails the
/// whole batch, as does a reply that does not account for every item.
fn retryable_items(
    batch: usize,
    status: u16,
    body: &Value,
    sent: &[BulkItem],
) -> Result<Vec<BulkItem>, BulkError> {
    if !body.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(Vec::new());
    }

    let results = body
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if results.len() != sent.len() {
        return Err(BulkError::Rejected {
            batch,
            status,
            reason: format!(
                "bulk reply listed {} results for {} documents",
                results.len(),
                sent.len()
            ),
        });
    }

    let mut retry = Vec::new();
    for (item, result) in sent.iter().zip(results.iter()) {
        // each result is keyed by its action name; a result without one is a failure
        let outcome = result.as_object().and_then(|o| o.values().next());
        let status = outcome
            .and_then(|o| o.get("status"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0);

        if (200..300).contains(&status) {
            continue;
        }
        if RETRYABLE_STATUSES.contains(&status) {
            retry.push(item.clone());
            continue;
        }

        let reason = outcome
            .and_then(|o| o.get("error"))
            .and_then(|e| e.get("reason"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(BulkError::Rejected {
            batch,
            status,
            reason: format!(
                "document {} rejected: {}",
                item.id.as_deref().unwrap_or("<generated>"),
                reason
            ),
        });
    }

    Ok(retry)
}

/// Serde module for Duration with humantime format.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
