//! Create-if-absent index lifecycle.

use crate::backends::elasticsearch::IndexSettings;
use crate::backends::elasticsearch::schema::create_index_body;
use crate::core::SearchEngine;
use crate::types::DocumentKind;

/// Ensures `index` exists, creating it with the kind's analyzers and mapping.
///
/// The existence check always precedes creation. Returns true when the index
/// exists afterwards, whether it was already there or was just created; a
/// create that loses a race to a concurrent creator also counts. Every engine
/// failure is logged and reported as false, never propagated.
pub async fn ensure_index(
    engine: &dyn SearchEngine,
    index: &str,
    kind: DocumentKind,
    settings: &IndexSettings,
) -> bool {
    match engine.index_exists(index).await {
        Ok(true) => return true,
        Ok(false) => {}
        Err(e) => {
            tracing::error!(index = %index, error = %e, "Error while checking index existence");
            return false;
        }
    }

    let body = create_index_body(kind, settings);
    match engine.create_index(index, body).await {
        Ok(response) if response.is_success() => {
            tracing::info!(index = %index, kind = %kind, "Created index");
            true
        }
        Ok(response) if response.is_already_exists() => {
            tracing::debug!(index = %index, "Index created concurrently");
            true
        }
        Ok(response) => {
            tracing::error!(
                index = %index,
                status = response.status,
                response = %response.body,
                "Error while creating index"
            );
            false
        }
        Err(e) => {
            tracing::error!(index = %index, error = %e, "Error while creating index");
            false
        }
    }
}
