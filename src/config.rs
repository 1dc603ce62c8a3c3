//! Resolver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tuning knobs for a resolver instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Quiet period after the last keystroke before a global search is issued.
    pub debounce_ms: u64,
    /// Minimum trimmed query length (in characters) that triggers a global search.
    pub min_query_len: usize,
    /// Maximum queued search requests awaiting the search router.
    pub search_queue_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            min_query_len: 1,
            search_queue_capacity: 16,
        }
    }
}

impl ResolverConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_query_len == 0 {
            return Err(ConfigError::MustBePositive {
                field: "min_query_len".to_string(),
            });
        }
        if self.search_queue_capacity == 0 {
            return Err(ConfigError::MustBePositive {
                field: "search_queue_capacity".to_string(),
            });
        }
        Ok(())
    }

    /// Debounce delay as a `Duration`.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
