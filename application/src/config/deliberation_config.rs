//! Deliberation parameters: settings shared by the orchestrators and their adapters.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use summit_domain::DEFAULT_KEY_PREFIX;

/// Settings that control how rounds are run and how their state is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliberationConfig {
    /// How long a cancellation flag lives before expiring on its own.
    pub cancellation_ttl: Duration,
    /// Prefix of cancellation storage keys.
    pub cancellation_key_prefix: String,
    /// Prefix used to derive a topic when the caller does not provide one.
    pub topic_prefix: String,
    /// Buffered events per topic for in-process subscribers.
    pub event_capacity: usize,
}

impl Default for DeliberationConfig {
    fn default() -> Self {
        Self {
            cancellation_ttl: Duration::from_secs(120),
            cancellation_key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            topic_prefix: "summit/".to_string(),
            event_capacity: 256,
        }
    }
}

impl DeliberationConfig {
    // ==================== Builder Methods ====================

    pub fn with_cancellation_ttl(mut self, ttl: Duration) -> Self {
        self.cancellation_ttl = ttl;
        self
    }

    pub fn with_cancellation_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cancellation_key_prefix = prefix.into();
        self
    }

    pub fn with_topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.topic_prefix = prefix.into();
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}
