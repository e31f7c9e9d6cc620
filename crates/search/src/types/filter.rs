//! Search filter specification.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Page size used when the caller leaves `size` unset or zero.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// A multi-field search request.
///
/// Only `search_phrase` is required; every other field narrows the result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Free text matched against the kind's phrase fields.
    #[serde(default)]
    pub search_phrase: String,
    /// Optional city constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Optional state constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Optional street address constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    /// Markets to cross-reference; order is preserved in the generated query.
    #[serde(default)]
    pub markets: Vec<String>,
    /// Offset of the first hit.
    #[serde(default)]
    pub from: u32,
    /// Page size; zero means [`DEFAULT_PAGE_SIZE`].
    #[serde(default)]
    pub size: u32,
}

impl FilterSpec {
    /// Creates a filter for the given phrase.
    pub fn new(search_phrase: impl Into<String>) -> Self {
        Self {
            search_phrase: search_phrase.into(),
            ..Default::default()
        }
    }

    /// Sets the city constraint.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the state constraint.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the street address constraint.
    pub fn with_street_address(mut self, street_address: impl Into<String>) -> Self {
        self.street_address = Some(street_address.into());
        self
    }

    /// Adds a market to cross-reference.
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.markets.push(market.into());
        self
    }

    /// Sets offset and size.
    pub fn with_page(mut self, from: u32, size: u32) -> Self {
        self.from = from;
        self.size = size;
        self
    }

    /// The page size actually sent to the engine.
    pub fn effective_size(&self) -> u32 {
        if self.size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        }
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.search_phrase.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "searchPhrase".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the trimmed value when it carries any text.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
