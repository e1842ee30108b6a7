//! Event publisher port
//!
//! Delivers stream events to every subscriber of a topic (SSE hub or equivalent).

use async_trait::async_trait;
use summit_domain::StreamEvent;
use thiserror::Error;

/// Errors that can occur while publishing an event
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Publisher unavailable: {0}")]
    Unavailable(String),

    #[error("Hub rejected event (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Publisher for a round's stream events.
///
/// Best effort from the orchestrator's point of view: a failed publish is
/// logged and the round keeps going.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &StreamEvent) -> Result<(), PublishError>;
}
