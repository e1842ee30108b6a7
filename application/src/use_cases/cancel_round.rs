//! Cancel round use case
//!
//! Entry point for an out-of-band cancel request. It only writes the signal;
//! the round observes it at its next fragment or persona boundary, possibly
//! on another instance sharing the same store.

use crate::ports::cancellation_store::{CancellationSignalStore, CancellationStoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from a cancel request
#[derive(Error, Debug)]
pub enum CancelRoundError {
    #[error("Invalid topic: {0:?}")]
    InvalidTopic(String),

    #[error("Cancellation store error: {0}")]
    Store(#[from] CancellationStoreError),
}

pub struct CancelRoundUseCase {
    store: Arc<dyn CancellationSignalStore>,
}

impl CancelRoundUseCase {
    pub fn new(store: Arc<dyn CancellationSignalStore>) -> Self {
        Self { store }
    }

    /// Request cancellation of the round streaming to `topic`.
    ///
    /// Idempotent. Cancelling a topic with no running round is not an error;
    /// the entry simply expires.
    pub async fn execute(&self, topic: &str) -> Result<(), CancelRoundError> {
        if topic.trim().is_empty() {
            return Err(CancelRoundError::InvalidTopic(topic.to_string()));
        }
        self.store.cancel(topic).await?;
        info!(topic, "Cancellation requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MemoryStore;

    #[tokio::test]
    async fn test_marks_topic_cancelled() {
        let store = Arc::new(MemoryStore::new());
        let use_case = CancelRoundUseCase::new(store.clone());

        use_case.execute("summit/abc").await.unwrap();

        assert!(store.is_cancelled("summit/abc").await.unwrap());
        assert!(!store.is_cancelled("summit/other").await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let use_case = CancelRoundUseCase::new(store.clone());

        use_case.execute("summit/abc").await.unwrap();
        use_case.execute("summit/abc").await.unwrap();

        assert!(store.contains("summit/abc"));
    }

    #[tokio::test]
    async fn test_rejects_blank_topic() {
        let store = Arc::new(MemoryStore::new());
        let use_case = CancelRoundUseCase::new(store.clone());

        let err = use_case.execute("  ").await.unwrap_err();

        assert!(matches!(err, CancelRoundError::InvalidTopic(_)));
    }
}
