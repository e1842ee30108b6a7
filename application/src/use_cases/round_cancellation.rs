//! Cancellation token for one streaming round.
//!
//! A cancel request arrives through a separate request (possibly on another
//! instance), so the signal lives in the shared [`CancellationSignalStore`].
//! [`RoundCancellation`] polls that store and latches the result into a local
//! [`CancellationToken`], which the hosting process can also trip directly
//! (e.g. on shutdown).

use crate::ports::cancellation_store::CancellationSignalStore;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct RoundCancellation {
    store: Arc<dyn CancellationSignalStore>,
    topic: String,
    token: CancellationToken,
}

impl RoundCancellation {
    pub fn new(
        store: Arc<dyn CancellationSignalStore>,
        topic: impl Into<String>,
        token: CancellationToken,
    ) -> Self {
        Self {
            store,
            topic: topic.into(),
            token,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Check whether the round should stop.
    ///
    /// A store failure is logged and read as "not cancelled" so that an
    /// unavailable cache cannot end a round.
    pub async fn is_cancelled(&self) -> bool {
        if self.token.is_cancelled() {
            return true;
        }
        match self.store.is_cancelled(&self.topic).await {
            Ok(true) => {
                debug!(topic = %self.topic, "Cancellation observed");
                self.token.cancel();
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(topic = %self.topic, error = %e, "Cancellation check failed, continuing");
                false
            }
        }
    }
}
