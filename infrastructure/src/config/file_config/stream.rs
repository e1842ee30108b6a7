//! Streaming configuration from TOML (`[stream]` section)

use super::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Raw streaming configuration from TOML
///
/// ```toml
/// [stream]
/// channel_capacity = 256
/// topic_prefix = "summit/"
/// # Optional Mercure-compatible hub receiving every event as well
/// hub_url = "http://localhost:3000/.well-known/mercure"
/// hub_token = "..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamConfig {
    /// Buffered events per topic for in-process subscribers
    pub channel_capacity: usize,
    pub topic_prefix: String,
    pub hub_url: Option<String>,
    pub hub_token: Option<String>,
}

impl Default for FileStreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            topic_prefix: "summit/".to_string(),
            hub_url: None,
            hub_token: None,
        }
    }
}

impl FileStreamConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.channel_capacity == 0 {
            issues.push(ConfigIssue::warning(
                "stream.channel_capacity",
                "stream.channel_capacity cannot be 0, falling back to 256",
            ));
        }
        if let Some(url) = &self.hub_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            issues.push(ConfigIssue::error(
                "stream.hub_url",
                format!("stream.hub_url: '{url}' must start with http:// or https://"),
            ));
        }
        if self.hub_token.is_some() && self.hub_url.is_none() {
            issues.push(ConfigIssue::warning(
                "stream.hub_token",
                "stream.hub_token is set but stream.hub_url is not; the token is unused",
            ));
        }
        issues
    }
}
