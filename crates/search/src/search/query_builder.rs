//! Boolean "must" query composition.

use serde_json::{Value, json};

use super::market::MarketLookup;
use crate::types::{DocumentKind, FilterSpec, fields, non_blank};

/// Builds the clauses of the primary query, all combined with AND.
///
/// The phrase clause always comes first, followed by the optional city, state
/// and street address clauses in that order, and finally the market clause
/// when a lookup is given. Optional clauses only ever narrow the result set.
pub fn build_query(
    filter: &FilterSpec,
    kind: DocumentKind,
    market: Option<&MarketLookup>,
) -> Vec<Value> {
    let mut clauses = vec![phrase_clause(
        &filter.search_phrase,
        kind.descriptor().phrase_fields,
    )];

    let optional = [
        (fields::CITY, &filter.city),
        (fields::STATE, &filter.state),
        (fields::STREET_ADDRESS, &filter.street_address),
    ];
    for (field, value) in optional {
        if let Some(value) = non_blank(value) {
            clauses.push(fuzzy_match(field, value));
        }
    }

    if let Some(market) = market {
        clauses.push(market.clause().clone());
    }

    clauses
}

/// Wraps clauses into a paged search request body.
pub fn build_search_body(clauses: Vec<Value>, from: u32, size: u32) -> Value {
    json!({
        "query": { "bool": { "must": clauses } },
        "from": from,
        "size": size,
        "track_total_hits": true
    })
}

fn phrase_clause(phrase: &str, fields: &[&str]) -> Value {
    json!({
        "multi_match": {
            "query": phrase.trim(),
            "fields": fields,
            "fuzziness": "AUTO",
            "operator": "or"
        }
    })
}

fn fuzzy_match(field: &str, value: &str) -> Value {
    json!({
        "match": {
            field: {
                "query": value,
                "fuzziness": "AUTO",
                "operator": "or"
            }
        }
    })
}
