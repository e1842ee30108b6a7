//! Agent backend configuration from TOML (`[agent]` section)

use super::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Raw agent backend configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// base_url = "http://localhost:8000"
/// timeout_secs = 120          # whole request, including the streamed body
/// connect_timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}

impl FileAgentConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let url = self.base_url.trim();
        if url.is_empty() {
            issues.push(ConfigIssue::error("agent.base_url", "agent.base_url cannot be empty"));
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                "agent.base_url",
                format!("agent.base_url: '{url}' must start with http:// or https://"),
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error("agent.timeout_secs", "agent.timeout_secs cannot be 0"));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Severity;

    #[test]
    fn test_default_is_valid() {
        assert!(FileAgentConfig::default().validate().is_empty());
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let config = FileAgentConfig {
            base_url: "agent:8000".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "agent.base_url");
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_rejects_empty_url_and_zero_timeout() {
        let config = FileAgentConfig {
            base_url: "  ".to_string(),
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().len(), 2);
    }
}
