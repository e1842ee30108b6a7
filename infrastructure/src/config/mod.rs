//! Configuration file loading for summit
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `SUMMIT_` (`SUMMIT_AGENT__BASE_URL`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./summit.toml` or `./.summit.toml`
//! 4. Global: `$XDG_CONFIG_HOME/summit/config.toml` (or `~/.config/summit/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileAgentConfig, FileCancellationConfig, FileConfig, FileLoggingConfig,
    FileStreamConfig, Severity,
};
pub use loader::ConfigLoader;
