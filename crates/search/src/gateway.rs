//! The indexing and search gateway.
//!
//! Every public operation returns a [`Response`] envelope and never an
//! error: internal failures are logged and classified into an [`ErrorCode`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backends::elasticsearch::IndexSettings;
use crate::core::SearchEngine;
use crate::error::{GatewayError, GatewayResult, ValidationError};
use crate::index::{BulkLoader, BulkOptions, IndexNames, ensure_index};
use crate::search::{MarketLookup, SearchHits, build_query, build_search_body, run_search};
use crate::types::{
    Document, DocumentKind, ErrorCode, FilterSpec, IndexPayload, Response, SearchPayload,
};

/// Gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Prefix for physical index names; empty means bare display names.
    #[serde(default)]
    pub index_prefix: String,

    /// Settings applied to indexes the gateway creates.
    #[serde(default)]
    pub index: IndexSettings,

    /// Bulk job policy.
    #[serde(default)]
    pub bulk: BulkOptions,
}

/// Writes documents into per-kind indexes and searches them.
///
/// The engine handle is shared by every request and never reconfigured.
/// Index names are resolved once, at construction.
#[derive(Debug)]
pub struct SearchGateway {
    engine: Arc<dyn SearchEngine>,
    names: IndexNames,
    settings: IndexSettings,
    bulk: BulkLoader,
}

impl SearchGateway {
    /// Creates a gateway, resolving every kind's index name.
    ///
    /// Fails when an index name cannot be derived.
    pub fn new(engine: Arc<dyn SearchEngine>, config: GatewayConfig) -> GatewayResult<Self> {
        let names = IndexNames::new(&config.index_prefix)?;
        let bulk = BulkLoader::new(Arc::clone(&engine), config.bulk);

        tracing::info!(
            engine = engine.name(),
            properties = names.resolve(DocumentKind::Property)?,
            managements = names.resolve(DocumentKind::Management)?,
            "Search gateway initialized"
        );

        Ok(Self {
            engine,
            names,
            settings: config.index,
            bulk,
        })
    }

    /// The resolved index names.
    pub fn index_names(&self) -> &IndexNames {
        &self.names
    }

    /// The shared engine handle.
    pub fn engine(&self) -> &Arc<dyn SearchEngine> {
        &self.engine
    }

    /// Writes one document, creating its index first when missing.
    pub async fn index(&self, document: Document) -> Response<IndexPayload> {
        let kind = document.kind();
        let index = match self.names.resolve(kind) {
            Ok(index) => index,
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Cannot resolve index");
                return Response::with_code(ErrorCode::InternalError);
            }
        };

        if !ensure_index(self.engine.as_ref(), index, kind, &self.settings).await {
            return Response::with_code(ErrorCode::Failed);
        }

        let source = match document.to_source() {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(index = %index, document = ?document, error = %e, "Document not indexed");
                return Response::with_code(ErrorCode::InternalError);
            }
        };
        let id = document.id();

        match self.engine.index_document(index, id.as_deref(), source).await {
            Ok(resp) => {
                let stored_id = resp
                    .body
                    .get("_id")
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty());

                match stored_id {
                    Some(stored_id) if resp.is_success() => {
                        tracing::debug!(index = %index, id = %stored_id, "Indexed document");
                        Response::success(IndexPayload {
                            id: stored_id.to_string(),
                        })
                    }
                    _ => {
                        tracing::error!(
                            index = %index,
                            document = ?document,
                            status = resp.status,
                            response = %resp.body,
                            "Document not indexed"
                        );
                        Response::with_code(ErrorCode::Failed)
                    }
                }
            }
            Err(e) => {
                tracing::error!(index = %index, document = ?document, error = %e, "Document not indexed");
                Response::with_code(ErrorCode::InternalError)
            }
        }
    }

    /// Writes a batch of same-kind documents as a bulk job.
    ///
    /// Awaits the job's terminal outcome, retries included.
    pub async fn index_bulk(&self, documents: Vec<Document>) -> Response<String> {
        let kind = match batch_kind(&documents) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(error = %e, "Bulk request rejected");
                return Response::with_code(ErrorCode::from(&GatewayError::from(e)));
            }
        };

        let index = match self.names.resolve(kind) {
            Ok(index) => index,
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Cannot resolve index");
                return Response::with_code(ErrorCode::InternalError);
            }
        };

        if !ensure_index(self.engine.as_ref(), index, kind, &self.settings).await {
            return Response::with_code(ErrorCode::Failed);
        }

        let receiver = self.bulk.start(index.to_string(), documents);

        match receiver.await {
            Ok(Ok(summary)) => {
                tracing::info!(
                    index = %index,
                    documents = summary.documents,
                    batches = summary.batches,
                    retries = summary.retries,
                    "Bulk insert completed"
                );
                Response::success(format!(
                    "indexed {} documents into {}",
                    summary.documents, index
                ))
            }
            Ok(Err(e)) if e.before_transmission() => {
                tracing::error!(index = %index, error = %e, "Bulk index failed before sending");
                Response::with_code(ErrorCode::InternalError)
            }
            Ok(Err(e)) => {
                tracing::error!(index = %index, error = %e, "Bulk index failed");
                Response::with_code(ErrorCode::Failed)
            }
            Err(_) => {
                tracing::error!(index = %index, "Bulk job ended without reporting an outcome");
                Response::with_code(ErrorCode::InternalError)
            }
        }
    }

    /// Deletes a kind's index and every document in it.
    pub async fn delete_index(&self, kind: DocumentKind) -> Response<String> {
        let mut response = Response::with_code(ErrorCode::InternalError);

        let index = match self.names.resolve(kind) {
            Ok(index) => index,
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Cannot resolve index");
                return response;
            }
        };

        match self.engine.delete_index(index).await {
            Ok(resp) if resp.is_success() => {
                tracing::info!(index = %index, "Deleted index");
                response.payload = index.to_string();
                response.set_code(ErrorCode::Success);
            }
            Ok(resp) => {
                tracing::warn!(
                    index = %index,
                    status = resp.status,
                    response = %resp.body,
                    "Index not deleted"
                );
                response.set_code(ErrorCode::Failed);
            }
            Err(e) => {
                tracing::error!(index = %index, error = %e, "Error while deleting index");
                response.set_code(ErrorCode::from(&GatewayError::from(e)));
            }
        }

        response
    }

    /// Searches a kind's index, cross-referencing markets when given.
    ///
    /// Zero matches for `kind` is [`ErrorCode::NotFound`]. On failure the
    /// envelope keeps whatever part of the payload was already filled.
    pub async fn search(&self, filter: &FilterSpec, kind: DocumentKind) -> Response<SearchPayload> {
        let mut payload = SearchPayload::default();

        match self.run_search(filter, kind, &mut payload).await {
            Ok(()) => {
                let count = match kind {
                    DocumentKind::Property => payload.property_count,
                    DocumentKind::Management => payload.management_count,
                };
                let code = if count == 0 {
                    ErrorCode::NotFound
                } else {
                    ErrorCode::Success
                };
                Response::new(code, payload)
            }
            Err(e @ GatewayError::Validation(_)) => {
                tracing::warn!(kind = %kind, error = %e, "Search rejected");
                Response::new(ErrorCode::from(&e), payload)
            }
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Error while searching");
                Response::new(ErrorCode::from(&e), payload)
            }
        }
    }

    async fn run_search(
        &self,
        filter: &FilterSpec,
        kind: DocumentKind,
        payload: &mut SearchPayload,
    ) -> GatewayResult<()> {
        filter.validate()?;

        let index = self.names.resolve(kind)?;
        let size = filter.effective_size();

        // the market clause has to be part of the primary query before it is sent
        let lookup = MarketLookup::new(&filter.markets, kind);
        let clauses = build_query(filter, kind, lookup.as_ref());
        let body = build_search_body(clauses, filter.from, size);

        let (side, primary) = tokio::join!(
            self.market_side(lookup.as_ref(), size),
            run_search(self.engine.as_ref(), index, body)
        );

        let side = match side {
            Ok(Some((target, hits))) => hits.apply_to(target, payload),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };

        let primary = primary?;
        payload.elapsed_time_millis = primary.took;
        primary.apply_to(kind, payload)?;

        side
    }

    async fn market_side(
        &self,
        lookup: Option<&MarketLookup>,
        size: u32,
    ) -> GatewayResult<Option<(DocumentKind, SearchHits)>> {
        let Some(lookup) = lookup else {
            return Ok(None);
        };
        let index = self.names.resolve(lookup.target())?;
        let hits = lookup.execute(self.engine.as_ref(), index, size).await?;
        Ok(Some((lookup.target(), hits)))
    }
}

/// The kind shared by every document of a bulk request.
fn batch_kind(documents: &[Document]) -> Result<DocumentKind, ValidationError> {
    let first = documents.first().ok_or(ValidationError::EmptyBatch)?.kind();

    match documents.iter().find(|d| d.kind() != first) {
        Some(other) => Err(ValidationError::MixedKinds {
            expected: first.to_string(),
            found: other.kind().to_string(),
        }),
        None => Ok(first),
    }
}
