//! Infrastructure layer for summit
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod agent;
pub mod cancellation;
pub mod config;
pub mod logging;
pub mod pubsub;

#[cfg(test)]
pub(crate) mod test_http;

// Re-export commonly used types
pub use agent::{
    error::{AgentHttpError, Result},
    gateway::HttpAgentGateway,
};
pub use cancellation::InMemoryCancellationStore;
pub use config::{
    ConfigIssue, ConfigLoader, FileAgentConfig, FileCancellationConfig, FileConfig,
    FileLoggingConfig, FileStreamConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use pubsub::{BroadcastEventHub, MercurePublisher};
