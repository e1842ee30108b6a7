//! In-process pub/sub over tokio broadcast channels, one channel per topic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use summit_application::{EventPublisher, PublishError};
use summit_domain::StreamEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Topic-keyed broadcast hub.
///
/// Channels are created lazily by whichever comes first, a subscriber or a
/// publisher. Publishing with nobody listening is not an error. A terminal
/// event closes its topic once delivered: subscribers drain what is buffered
/// and then see the channel end.
pub struct BroadcastEventHub {
    topics: Mutex<HashMap<String, broadcast::Sender<StreamEvent>>>,
    capacity: usize,
}

impl BroadcastEventHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Receive every event published to `topic` from now on.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<StreamEvent> {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drop the topic's channel; current subscribers see it close.
    pub fn close(&self, topic: &str) {
        self.topics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(topic);
    }

    /// Number of open topics
    pub fn topic_count(&self) -> usize {
        self.topics.lock().map(|t| t.len()).unwrap_or(0)
    }
}

impl Default for BroadcastEventHub {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventHub {
    async fn publish(&self, topic: &str, event: &StreamEvent) -> Result<(), PublishError> {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        let sender = topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        // No receivers is fine; the event is simply not observed
        let receivers = sender.send(event.clone()).unwrap_or(0);
        trace!(topic, kind = %event.kind(), receivers, "Published event");

        if event.is_terminal() {
            topics.remove(topic);
        }
        Ok(())
    }
}
