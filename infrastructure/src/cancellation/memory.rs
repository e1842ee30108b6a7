//! In-process cancellation store
//!
//! Suits a single process where the cancel request and the round share
//! memory. Multi-instance deployments need a networked store behind the same
//! port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use summit_application::{CancellationSignalStore, CancellationStoreError, DeliberationConfig};
use summit_domain::CancellationKey;
use tokio::time::Instant;
use tracing::trace;

/// Cancelled topics and the instant each entry expires
type Entries = HashMap<CancellationKey, Instant>;

/// TTL map of cancelled topics.
///
/// Expired entries are dropped lazily on read and swept on every write, so
/// the map never outgrows the set of topics cancelled within one TTL.
pub struct InMemoryCancellationStore {
    entries: Mutex<Entries>,
    ttl: Duration,
    key_prefix: String,
}

impl InMemoryCancellationStore {
    pub fn new(ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn from_config(config: &DeliberationConfig) -> Self {
        Self::new(config.cancellation_ttl, config.cancellation_key_prefix.clone())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|expiry| **expiry > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(&self, topic: &str) -> CancellationKey {
        CancellationKey::for_topic(&self.key_prefix, topic)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, CancellationStoreError> {
        self.entries
            .lock()
            .map_err(|_| CancellationStoreError::Other("cancellation map poisoned".to_string()))
    }
}

impl Default for InMemoryCancellationStore {
    fn default() -> Self {
        Self::from_config(&DeliberationConfig::default())
    }
}

#[async_trait]
impl CancellationSignalStore for InMemoryCancellationStore {
    async fn cancel(&self, topic: &str) -> Result<(), CancellationStoreError> {
        let now = Instant::now();
        let key = self.key(topic);
        let mut entries = self.lock()?;
        entries.retain(|_, expiry| *expiry > now);
        trace!(%key, "Storing cancellation flag");
        entries.insert(key, now + self.ttl);
        Ok(())
    }

    async fn is_cancelled(&self, topic: &str) -> Result<bool, CancellationStoreError> {
        let key = self.key(topic);
        let mut entries = self.lock()?;
        match entries.get(&key) {
            Some(expiry) if *expiry > Instant::now() => Ok(true),
            Some(_) => {
                entries.remove(&key);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self, topic: &str) -> Result<(), CancellationStoreError> {
        let key = self.key(topic);
        self.lock()?.remove(&key);
        Ok(())
    }
}
