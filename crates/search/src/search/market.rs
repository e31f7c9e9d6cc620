//! Cross-entity market lookup.
//!
//! A search that names markets also asks the other document kind which of
//! its records sit in those markets. The lookup's "any of" phrase clause is
//! run on its own against the other kind's index and is additionally ANDed
//! into the primary query.

use serde_json::{Value, json};

use super::hits::{SearchHits, run_search};
use crate::core::SearchEngine;
use crate::error::GatewayResult;
use crate::types::{DocumentKind, fields};

/// A market "any of" lookup against the subject kind's cross-reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketLookup {
    markets: Vec<String>,
    target: DocumentKind,
    clause: Value,
}

impl MarketLookup {
    /// Builds the lookup; `None` when no market carries any text.
    ///
    /// Market order is preserved in the generated clause.
    pub fn new(markets: &[String], subject: DocumentKind) -> Option<Self> {
        let markets: Vec<String> = markets
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        if markets.is_empty() {
            return None;
        }

        let field = fields::MARKET;
        let should: Vec<Value> = markets
            .iter()
            .map(|market| json!({ "match_phrase": { field: market } }))
            .collect();
        let clause = json!({
            "bool": {
                "should": should,
                "minimum_should_match": 1
            }
        });

        Some(Self {
            markets,
            target: subject.cross_reference(),
            clause,
        })
    }

    /// The OR-group clause shared by the side query and the primary query.
    pub fn clause(&self) -> &Value {
        &self.clause
    }

    /// Kind whose index the side query runs against.
    pub fn target(&self) -> DocumentKind {
        self.target
    }

    /// Markets in request order.
    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    /// The side query body.
    pub fn side_query(&self, size: u32) -> Value {
        json!({
            "query": { "bool": { "must": [self.clause.clone()] } },
            "size": size,
            "track_total_hits": true
        })
    }

    /// Runs the side query against the target kind's `index`.
    ///
    /// No matches, including a target index that does not exist yet, is an
    /// empty result rather than an error.
    pub async fn execute(
        &self,
        engine: &dyn SearchEngine,
        index: &str,
        size: u32,
    ) -> GatewayResult<SearchHits> {
        tracing::debug!(
            index = %index,
            target = %self.target,
            markets = ?self.markets,
            "Running market lookup"
        );
        run_search(engine, index, self.side_query(size)).await
    }
}
