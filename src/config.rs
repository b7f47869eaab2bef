//! Serializable custom pattern configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Custom patterns to layer over the built-in defaults.
///
/// ```json
/// { "quote_headers": ["^Forwarded by .+$"], "signatures": ["^Posted using MyApp$"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Extra quote-header patterns, in matching order
    pub quote_headers: Vec<String>,

    /// Extra signature patterns, in matching order
    pub signatures: Vec<String>,
}

impl PatternConfig {
    /// Decode a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode this configuration as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quote_headers.is_empty() && self.signatures.is_empty()
    }
}
