//! Physical index names per document kind.

use std::collections::HashMap;

use crate::error::{GatewayError, GatewayResult};
use crate::types::DocumentKind;

/// Index names resolved once at startup and fixed for the gateway's lifetime.
#[derive(Debug, Clone)]
pub struct IndexNames {
    names: HashMap<DocumentKind, String>,
}

impl IndexNames {
    /// Derives the index name of every kind from its declared display name.
    ///
    /// With a non-empty `prefix` names are `{prefix}_{display_name}`.
    /// Fails when a kind declares no display name or a derived name is not a
    /// legal index name.
    pub fn new(prefix: &str) -> GatewayResult<Self> {
        let prefix = prefix.trim();
        let mut names = HashMap::new();

        for kind in DocumentKind::ALL {
            let display_name = kind.descriptor().display_name;
            if display_name.is_empty() {
                return Err(GatewayError::Configuration {
                    message: format!("document kind '{}' declares no index name", kind),
                });
            }

            let name = if prefix.is_empty() {
                display_name.to_string()
            } else {
                format!("{}_{}", prefix, display_name)
            };
            validate_index_name(&name)?;
            names.insert(kind, name);
        }

        Ok(Self { names })
    }

    /// Returns the index name for a kind.
    pub fn resolve(&self, kind: DocumentKind) -> GatewayResult<&str> {
        self.names
            .get(&kind)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::Configuration {
                message: format!("no index name resolved for '{}'", kind),
            })
    }
}

/// Checks Elasticsearch's index naming rules.
fn validate_index_name(name: &str) -> GatewayResult<()> {
    const FORBIDDEN: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ' ', ':'];

    let invalid = |reason: &str| GatewayError::Configuration {
        message: format!("invalid index name '{}': {}", name, reason),
    };

    if name.chars().any(|c| c.is_uppercase()) {
        return Err(invalid("must be lowercase"));
    }
    if name.contains(FORBIDDEN) {
        return Err(invalid("contains a forbidden character"));
    }
    if name.starts_with(['-', '_', '+']) {
        return Err(invalid("must not start with '-', '_' or '+'"));
    }
    if name == "." || name == ".." {
        return Err(invalid("reserved name"));
    }
    if name.len() > 255 {
        return Err(invalid("longer than 255 bytes"));
    }
    Ok(())
}
