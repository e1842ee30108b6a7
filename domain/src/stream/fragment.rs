//! Fragments streamed by the agent backend.

use serde::{Deserialize, Serialize};

/// One incremental unit of a streaming persona invocation.
///
/// Terminal results (complete/error) are not fragments: they are the return
/// value of the streaming gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentFragment {
    /// A piece of generated text.
    Text { content: String },
    /// The agent is reasoning.
    Thinking,
    /// The agent is calling a tool.
    ToolUse { tool_name: String },
    /// A tool returned a result.
    ToolResult { tool_name: String },
}

impl AgentFragment {
    pub fn text(content: impl Into<String>) -> Self {
        AgentFragment::Text {
            content: content.into(),
        }
    }

    /// Returns the text content if this is a `Text` fragment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AgentFragment::Text { content } => Some(content),
            _ => None,
        }
    }
}
