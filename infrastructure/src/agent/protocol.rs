//! Wire types for the agent backend.
//!
//! # Request
//!
//! Both endpoints take the same body:
//!
//! ```json
//! { "message": "...", "session_id": "...",
//!   "context": { "metadata": { "persona": "gandalf", "correlation_id": "...",
//!                              "active_personas": ["gandalf", "terminator"] } } }
//! ```
//!
//! # Streaming frames
//!
//! Each SSE `data:` payload is one JSON object tagged by `type`:
//! `text`, `thinking`, `tool_use`, `tool_result`, then exactly one terminal
//! `complete` or `error`. Older backends send bare `{"data": "chunk"}` frames,
//! which are read as text.

use serde::{Deserialize, Serialize};
use summit_domain::{AgentContext, AgentFragment, AgentReply, CorrelationId, Persona};

/// Request body for `/invoke` and `/stream`
#[derive(Debug, Serialize)]
pub struct InvokeRequest<'a> {
    pub message: &'a str,
    pub session_id: Option<&'a str>,
    pub context: RequestContext<'a>,
}

#[derive(Debug, Serialize)]
pub struct RequestContext<'a> {
    pub metadata: RequestMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct RequestMetadata<'a> {
    pub persona: &'a Persona,
    pub correlation_id: CorrelationId,
    pub active_personas: &'a [Persona],
}

impl<'a> InvokeRequest<'a> {
    pub fn new(message: &'a str, context: &'a AgentContext, session_id: Option<&'a str>) -> Self {
        Self {
            message,
            session_id,
            context: RequestContext {
                metadata: RequestMetadata {
                    persona: context.persona(),
                    correlation_id: context.correlation_id(),
                    active_personas: context.active_personas(),
                },
            },
        }
    }
}

/// Response body of `/invoke`
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeResponse {
    pub text: String,
    /// Persona that produced the reply
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub has_objective: bool,
}

impl From<InvokeResponse> for AgentReply {
    fn from(response: InvokeResponse) -> Self {
        AgentReply {
            text: response.text,
            has_objective: response.has_objective,
        }
    }
}

/// One decoded SSE frame from `/stream`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    Text {
        content: String,
    },
    Thinking,
    ToolUse {
        #[serde(default)]
        tool_name: String,
    },
    ToolResult {
        #[serde(default)]
        tool_name: String,
    },
    Complete {
        #[serde(default)]
        text: String,
        #[serde(default)]
        has_objective: bool,
    },
    Error {
        #[serde(default)]
        message: String,
        #[serde(default)]
        code: Option<String>,
    },
    /// A `type` this client does not know; skipped
    #[serde(other)]
    Unknown,
}

/// Frame shape sent by older backends
#[derive(Debug, Deserialize)]
struct LegacyFrame {
    data: String,
}

impl StreamFrame {
    /// Decode one `data:` payload.
    pub fn parse(payload: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        if value.get("type").is_none()
            && let Ok(legacy) = serde_json::from_value::<LegacyFrame>(value.clone())
        {
            return Ok(StreamFrame::Text {
                content: legacy.data,
            });
        }
        serde_json::from_value(value)
    }

    /// The fragment an observer sees for this frame, if any.
    pub fn fragment(&self) -> Option<AgentFragment> {
        match self {
            StreamFrame::Text { content } => Some(AgentFragment::text(content.clone())),
            StreamFrame::Thinking => Some(AgentFragment::Thinking),
            StreamFrame::ToolUse { tool_name } => Some(AgentFragment::ToolUse {
                tool_name: tool_name.clone(),
            }),
            StreamFrame::ToolResult { tool_name } => Some(AgentFragment::ToolResult {
                tool_name: tool_name.clone(),
            }),
            StreamFrame::Complete { .. } | StreamFrame::Error { .. } | StreamFrame::Unknown => {
                None
            }
        }
    }
}
