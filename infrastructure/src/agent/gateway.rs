//! HTTP implementation of the agent gateway

use crate::agent::error::{AgentHttpError, Result};
use crate::agent::protocol::{InvokeRequest, InvokeResponse, StreamFrame};
use crate::agent::sse::SseDecoder;
use crate::config::FileAgentConfig;
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use summit_application::{AgentGateway, FragmentObserver, GatewayError, StreamControl};
use summit_domain::{AgentContext, AgentReply};
use tracing::{debug, trace, warn};

/// Gateway to the persona backend over HTTP
pub struct HttpAgentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AgentHttpError::InvalidBaseUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &FileAgentConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> std::result::Result<(), GatewayError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(AgentHttpError::from)?;
        check_status(response).await?;
        Ok(())
    }

    async fn post(
        &self,
        path: &str,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
    ) -> Result<reqwest::Response> {
        let request = InvokeRequest::new(message, context, session_id);
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&request)
            .send()
            .await?;
        check_status(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AgentHttpError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn invoke(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
    ) -> std::result::Result<AgentReply, GatewayError> {
        debug!(persona = %context.persona(), "POST /invoke");
        let response = self.post("/invoke", message, context, session_id).await?;
        let raw = response.text().await.map_err(AgentHttpError::from)?;
        let parsed: InvokeResponse =
            serde_json::from_str(&raw).map_err(|e| AgentHttpError::ParseError {
                error: e.to_string(),
                raw,
            })?;
        Ok(parsed.into())
    }

    async fn invoke_streaming(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
        observer: &mut dyn FragmentObserver,
    ) -> std::result::Result<AgentReply, GatewayError> {
        debug!(persona = %context.persona(), "POST /stream");
        let response = self.post("/stream", message, context, session_id).await?;

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut text = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(AgentHttpError::from)?;
            for payload in decoder.push(&chunk) {
                if let Some(step) = handle_frame(&payload, &mut text, observer).await? {
                    return Ok(step);
                }
            }
        }

        if let Some(payload) = decoder.finish()
            && let Some(step) = handle_frame(&payload, &mut text, observer).await?
        {
            return Ok(step);
        }

        warn!(persona = %context.persona(), "Stream ended without a terminal frame");
        Ok(AgentReply::new(text))
    }
}

/// Apply one frame. Returns the final reply once the call is over, either
/// because the backend finished or because the observer asked to stop.
async fn handle_frame(
    payload: &str,
    text: &mut String,
    observer: &mut dyn FragmentObserver,
) -> std::result::Result<Option<AgentReply>, GatewayError> {
    let frame = match StreamFrame::parse(payload) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, payload, "Skipping malformed stream frame");
            return Ok(None);
        }
    };

    match frame {
        StreamFrame::Complete {
            text: full,
            has_objective,
        } => {
            let text = if text.is_empty() {
                full
            } else {
                std::mem::take(text)
            };
            Ok(Some(AgentReply {
                text,
                has_objective,
            }))
        }
        StreamFrame::Error { message, code } => {
            debug!(?code, "Backend stream error");
            Err(AgentHttpError::Backend(message).into())
        }
        StreamFrame::Unknown => {
            trace!(payload, "Unknown stream frame");
            Ok(None)
        }
        frame => {
            if let StreamFrame::Text { content } = &frame {
                text.push_str(content);
            }
            let Some(fragment) = frame.fragment() else {
                return Ok(None);
            };
            match observer.on_fragment(&fragment).await {
                StreamControl::Continue => Ok(None),
                StreamControl::Stop => Ok(Some(AgentReply::new(std::mem::take(text)))),
            }
        }
    }
}
