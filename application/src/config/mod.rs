//! Application-level configuration.
//!
//! - [`DeliberationConfig`]: cancellation window, key/topic naming and event buffering

pub mod deliberation_config;

pub use deliberation_config::DeliberationConfig;
