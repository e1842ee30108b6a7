//! Publisher for a Mercure-compatible hub.
//!
//! Each event is POSTed to the hub as a form with `topic` and `data` (the
//! event's JSON), authorised with an optional bearer token.

use async_trait::async_trait;
use std::time::Duration;
use summit_application::{EventPublisher, PublishError};
use summit_domain::StreamEvent;
use tracing::trace;

pub struct MercurePublisher {
    client: reqwest::Client,
    hub_url: String,
    token: Option<String>,
}

impl MercurePublisher {
    pub fn new(hub_url: impl Into<String>, token: Option<String>) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            hub_url: hub_url.into(),
            token,
        })
    }

    pub fn hub_url(&self) -> &str {
        &self.hub_url
    }
}

#[async_trait]
impl EventPublisher for MercurePublisher {
    async fn publish(&self, topic: &str, event: &StreamEvent) -> Result<(), PublishError> {
        let data = serde_json::to_string(event)?;
        let mut request = self
            .client
            .post(&self.hub_url)
            .form(&[("topic", topic), ("data", data.as_str())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        trace!(topic, kind = %event.kind(), "Forwarded event to hub");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_http::{response, serve_once};
    use summit_domain::{CorrelationId, StreamPayload};

    fn event() -> StreamEvent {
        StreamEvent::for_round(
            "summit/s-1",
            CorrelationId::new(),
            StreamPayload::RoundCancelled { completed: 2 },
        )
    }

    #[tokio::test]
    async fn test_posts_form_with_bearer_token() {
        let (url, request) = serve_once(response("200 OK", "text/plain", "urn:uuid:1")).await;
        let publisher =
            MercurePublisher::new(format!("{url}/.well-known/mercure"), Some("jwt".to_string()))
                .unwrap();

        publisher.publish("summit/s-1", &event()).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /.well-known/mercure "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer jwt"));
        assert!(request.contains("application/x-www-form-urlencoded"));
        assert!(request.contains("topic=summit%2Fs-1"));
        assert!(request.contains("round_cancelled"));
    }

    #[tokio::test]
    async fn test_rejection_keeps_status_and_body() {
        let (url, _request) =
            serve_once(response("401 Unauthorized", "text/plain", "bad jwt")).await;
        let publisher = MercurePublisher::new(url, None).unwrap();

        let err = publisher.publish("summit/s-1", &event()).await.unwrap_err();

        match err {
            PublishError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad jwt");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
