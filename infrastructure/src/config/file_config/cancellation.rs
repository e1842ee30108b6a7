//! Cancellation configuration from TOML (`[cancellation]` section)

use super::ConfigIssue;
use serde::{Deserialize, Serialize};
use summit_domain::DEFAULT_KEY_PREFIX;

/// Raw cancellation configuration from TOML
///
/// ```toml
/// [cancellation]
/// ttl_secs = 120
/// key_prefix = "summit_cancel_"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCancellationConfig {
    /// Lifetime of a cancel request that nobody clears
    pub ttl_secs: u64,
    pub key_prefix: String,
}

impl Default for FileCancellationConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 120,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl FileCancellationConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.ttl_secs == 0 {
            vec![ConfigIssue::warning(
                "cancellation.ttl_secs",
                "cancellation.ttl_secs cannot be 0, falling back to 120",
            )]
        } else {
            vec![]
        }
    }
}
