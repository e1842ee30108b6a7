//! Cancellation signal store port
//!
//! A small key/value store with expiry mapping a topic to a "cancelled" flag.
//! A separate request sets the flag; the detached round polls it.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the backing store
#[derive(Error, Debug)]
pub enum CancellationStoreError {
    #[error("Cancellation store unavailable: {0}")]
    Unavailable(String),

    #[error("Cancellation store error: {0}")]
    Other(String),
}

/// Store of per-topic cancellation flags.
///
/// Implementations must be safe for concurrent use from many rounds and
/// give read-after-write visibility to the instance that called `cancel`.
/// Entries expire after a fixed window even if never cleared.
#[async_trait]
pub trait CancellationSignalStore: Send + Sync {
    /// Flag `topic` as cancelled. Idempotent.
    async fn cancel(&self, topic: &str) -> Result<(), CancellationStoreError>;

    /// `false` for any topic without a live entry.
    async fn is_cancelled(&self, topic: &str) -> Result<bool, CancellationStoreError>;

    /// Remove the entry for `topic`. No-op if absent.
    async fn clear(&self, topic: &str) -> Result<(), CancellationStoreError>;
}
