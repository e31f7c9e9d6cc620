//! Query composition, the market lookup, and search reply parsing.

mod hits;
mod market;
mod query_builder;

pub use hits::SearchHits;
pub(crate) use hits::run_search;
pub use market::MarketLookup;
pub use query_builder::{build_query, build_search_body};
