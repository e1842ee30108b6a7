//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section has defaults, so a partial file (or none) is valid.

mod agent;
mod cancellation;
mod logging;
mod stream;

pub use agent::FileAgentConfig;
pub use cancellation::FileCancellationConfig;
pub use logging::FileLoggingConfig;
pub use stream::FileStreamConfig;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use summit_application::DeliberationConfig;

/// How serious a configuration problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A default is used instead
    Warning,
    /// The setting cannot work as given
    Error,
}

/// A problem found while validating the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key, e.g. `agent.base_url`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub(crate) fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent backend connection
    pub agent: FileAgentConfig,
    /// Cancellation signal storage
    pub cancellation: FileCancellationConfig,
    /// Event streaming
    pub stream: FileStreamConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.agent.validate());
        issues.extend(self.cancellation.validate());
        issues.extend(self.stream.validate());
        issues
    }

    /// Application-level settings derived from this file.
    ///
    /// Zero values that [`validate`](Self::validate) warns about fall back
    /// to the defaults here.
    pub fn to_deliberation_config(&self) -> DeliberationConfig {
        let defaults = DeliberationConfig::default();
        let ttl = match self.cancellation.ttl_secs {
            0 => defaults.cancellation_ttl,
            secs => Duration::from_secs(secs),
        };
        let capacity = match self.stream.channel_capacity {
            0 => defaults.event_capacity,
            n => n,
        };

        defaults
            .with_cancellation_ttl(ttl)
            .with_cancellation_key_prefix(self.cancellation.key_prefix.clone())
            .with_topic_prefix(self.stream.topic_prefix.clone())
            .with_event_capacity(capacity)
    }
}
