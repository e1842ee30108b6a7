//! Composite publisher: fans one event out to several publishers.

use super::event_publisher::{EventPublisher, PublishError};
use async_trait::async_trait;
use std::sync::Arc;
use summit_domain::StreamEvent;

/// Publishes every event to all inner publishers, in order.
///
/// Every publisher is attempted even if an earlier one fails; the first
/// failure is returned.
pub struct CompositePublisher {
    publishers: Vec<Arc<dyn EventPublisher>>,
}

impl CompositePublisher {
    pub fn new(publishers: Vec<Arc<dyn EventPublisher>>) -> Self {
        Self { publishers }
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

#[async_trait]
impl EventPublisher for CompositePublisher {
    async fn publish(&self, topic: &str, event: &StreamEvent) -> Result<(), PublishError> {
        let mut first_error = None;
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(topic, event).await
                && first_error.is_none()
            {
                first_error = Some(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
