//! Elasticsearch index settings, analyzers and mappings.
//!
//! Every index gets the same three analyzers; the field mapping is derived
//! from the kind's descriptor table so index creation and querying agree on
//! which analyzer backs which field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::types::{AnalyzerKind, DocumentKind, FieldSpec};

/// Standard analyzer with English stop words.
pub const STANDARD_ENGLISH_ANALYZER: &str = "standard_english";
/// Lowercase + edge n-gram analyzer for prefix matching.
pub const PARTIAL_TEXT_ANALYZER: &str = "partial_text";
/// Lowercase + stop + snowball analyzer for stemmed matching.
pub const FULL_TEXT_ANALYZER: &str = "full_text";
/// Edge n-gram token filter used by [`PARTIAL_TEXT_ANALYZER`].
pub const PARTIAL_EDGE_NGRAM_FILTER: &str = "partial_edge_ngram";

/// Per-index settings applied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Number of primary shards per index (default: 1).
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,

    /// Number of replica shards per index (default: 1).
    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,

    /// Refresh interval (default: "1s").
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    /// Shortest prefix indexed for partial fields (default: 1).
    #[serde(default = "default_min_gram")]
    pub min_gram: u32,

    /// Longest prefix indexed for partial fields (default: 20).
    #[serde(default = "default_max_gram")]
    pub max_gram: u32,
}

fn default_shards() -> u32 {
    1
}

fn default_replicas() -> u32 {
    1
}

fn default_refresh_interval() -> String {
    "1s".to_string()
}

fn default_min_gram() -> u32 {
    1
}

fn default_max_gram() -> u32 {
    20
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: default_shards(),
            number_of_replicas: default_replicas(),
            refresh_interval: default_refresh_interval(),
            min_gram: default_min_gram(),
            max_gram: default_max_gram(),
        }
    }
}

/// Builds the full create-index body for a document kind.
pub fn create_index_body(kind: DocumentKind, settings: &IndexSettings) -> Value {
    json!({
        "settings": {
            "number_of_shards": settings.number_of_shards,
            "number_of_replicas": settings.number_of_replicas,
            "refresh_interval": settings.refresh_interval,
            // edge n-grams need a wider gap than the default of 1
            "index.max_ngram_diff": settings.max_gram.saturating_sub(settings.min_gram),
            "analysis": analysis_settings(settings),
        },
        "mappings": create_mapping(kind),
    })
}

/// The analysis block shared by every index.
pub fn analysis_settings(settings: &IndexSettings) -> Value {
    json!({
        "filter": {
            PARTIAL_EDGE_NGRAM_FILTER: {
                "type": "edge_ngram",
                "min_gram": settings.min_gram,
                "max_gram": settings.max_gram
            }
        },
        "analyzer": {
            STANDARD_ENGLISH_ANALYZER: {
                "type": "standard",
                "stopwords": "_english_"
            },
            PARTIAL_TEXT_ANALYZER: {
                "type": "custom",
                "tokenizer": "standard",
                "filter": ["lowercase", PARTIAL_EDGE_NGRAM_FILTER]
            },
            FULL_TEXT_ANALYZER: {
                "type": "custom",
                "tokenizer": "standard",
                "filter": ["lowercase", "stop", "snowball"]
            }
        }
    })
}

/// Derives the mapping from the kind's field table.
pub fn create_mapping(kind: DocumentKind) -> Value {
    let properties: Map<String, Value> = kind
        .descriptor()
        .fields
        .iter()
        .map(|field| (field.name.to_string(), field_mapping(field)))
        .collect();

    json!({ "properties": properties })
}

fn field_mapping(field: &FieldSpec) -> Value {
    match field.analyzer {
        AnalyzerKind::Partial => json!({
            "type": "text",
            "analyzer": PARTIAL_TEXT_ANALYZER,
            // query text is not n-grammed, otherwise every prefix would match
            "search_analyzer": "standard",
            "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
        }),
        AnalyzerKind::FullText => text_mapping(FULL_TEXT_ANALYZER),
        AnalyzerKind::StandardEnglish => text_mapping(STANDARD_ENGLISH_ANALYZER),
        AnalyzerKind::Keyword => json!({ "type": "keyword" }),
        AnalyzerKind::Numeric => json!({ "type": "long" }),
    }
}

fn text_mapping(analyzer: &str) -> Value {
    json!({
        "type": "text",
        "analyzer": analyzer,
        "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
    })
}
