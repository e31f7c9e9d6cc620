//! Document handlers: post, bulk post, find and delete-all.
//!
//! The same four handlers serve both document kinds. Each is instantiated per
//! kind through [`DocumentRoute`], so `post_handler::<PropertyDocument>` only
//! accepts property bodies.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use realty_search::{
    Document, DocumentKind, FilterSpec, IndexPayload, ManagementDocument, PropertyDocument,
    Response as Envelope, SearchPayload,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// A document type with its own set of routes.
pub trait DocumentRoute: DeserializeOwned + Into<Document> + Send + 'static {
    /// The kind every request on these routes targets.
    const KIND: DocumentKind;
}

impl DocumentRoute for PropertyDocument {
    const KIND: DocumentKind = DocumentKind::Property;
}

impl DocumentRoute for ManagementDocument {
    const KIND: DocumentKind = DocumentKind::Management;
}

/// Indexes a single document.
///
/// # HTTP Request
///
/// `POST /api/v1/{kind}/post`
pub async fn post_handler<D: DocumentRoute>(
    State(state): State<AppState>,
    body: Result<Json<D>, JsonRejection>,
) -> RestResult<Json<Envelope<IndexPayload>>> {
    let Json(document) = body?;
    debug!(kind = ?D::KIND, "Processing post request");

    Ok(Json(state.gateway().index(document.into()).await))
}

/// Indexes many documents of one kind.
///
/// # HTTP Request
///
/// `POST /api/v1/{kind}/post/bulk`
pub async fn bulk_handler<D: DocumentRoute>(
    State(state): State<AppState>,
    body: Result<Json<Vec<D>>, JsonRejection>,
) -> RestResult<Json<Envelope<String>>> {
    let Json(documents) = body?;
    debug!(kind = ?D::KIND, count = documents.len(), "Processing bulk request");

    let documents: Vec<Document> = documents.into_iter().map(Into::into).collect();
    Ok(Json(state.gateway().index_bulk(documents).await))
}

/// Searches documents of the route's kind.
///
/// # HTTP Request
///
/// `POST /api/v1/{kind}/find`
pub async fn find_handler<D: DocumentRoute>(
    State(state): State<AppState>,
    body: Result<Json<FilterSpec>, JsonRejection>,
) -> RestResult<Json<Envelope<SearchPayload>>> {
    let Json(filter) = body?;
    debug!(kind = ?D::KIND, phrase = %filter.search_phrase, "Processing find request");

    Ok(Json(state.gateway().search(&filter, D::KIND).await))
}

/// Deletes the index of the route's kind.
///
/// # HTTP Request
///
/// `DELETE /api/v1/{kind}/deleteall`
pub async fn delete_all_handler<D: DocumentRoute>(
    State(state): State<AppState>,
) -> Json<Envelope<String>> {
    debug!(kind = ?D::KIND, "Processing delete-all request");

    Json(state.gateway().delete_index(D::KIND).await)
}
