//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// conversation_log = "~/.local/share/summit/transcript.jsonl"
/// file = "~/.local/share/summit/summit.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of rounds
    pub conversation_log: Option<PathBuf>,
    /// Diagnostic log file, in addition to stderr
    pub file: Option<PathBuf>,
}
