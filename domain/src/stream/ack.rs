//! Acknowledgment returned before a streaming round runs

use serde::{Deserialize, Serialize};

/// Immediate answer to a streaming request: `{status: "streaming", session_id, topic}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingAck {
    pub status: String,
    pub session_id: Option<String>,
    pub topic: String,
}

impl StreamingAck {
    pub const STATUS: &'static str = "streaming";

    pub fn new(session_id: Option<String>, topic: impl Into<String>) -> Self {
        Self {
            status: Self::STATUS.to_string(),
            session_id,
            topic: topic.into(),
        }
    }
}
