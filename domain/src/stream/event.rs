//! Events published to a round's topic.
//!
//! All events of one round go to a single topic. Each event carries the
//! round's correlation id and, for persona-scoped events, the persona and
//! its zero-based position, so a subscriber can rebuild the transcript and
//! attribute every token to the right speaker.
//!
//! ```text
//! persona_started(0) → token(0)* → persona_completed(0)
//!   → persona_started(1) → ... → round_completed
//!
//! any point → round_cancelled        (cancellation observed)
//! any point → persona_failed(k)      (gateway failure, round stops)
//! any point → round_aborted          (the round's task died)
//! ```

use crate::core::correlation::CorrelationId;
use crate::core::persona::Persona;
use serde::{Deserialize, Serialize};

/// Event payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamPayload {
    /// A text fragment from the persona currently speaking.
    Token { content: String },
    PersonaStarted,
    PersonaCompleted { text: String, has_objective: bool },
    PersonaFailed { message: String },
    /// Every persona answered.
    RoundCompleted { responses: usize },
    /// The round was stopped by a cancellation request.
    RoundCancelled { completed: usize },
    /// The round's task ended without reaching any other terminal event.
    RoundAborted { message: String },
}

/// Discriminant of [`StreamPayload`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamEventKind {
    Token,
    PersonaStarted,
    PersonaCompleted,
    PersonaFailed,
    RoundCompleted,
    RoundCancelled,
    RoundAborted,
}

impl StreamEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::PersonaStarted => "persona_started",
            Self::PersonaCompleted => "persona_completed",
            Self::PersonaFailed => "persona_failed",
            Self::RoundCompleted => "round_completed",
            Self::RoundCancelled => "round_cancelled",
            Self::RoundAborted => "round_aborted",
        }
    }
}

impl std::fmt::Display for StreamEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The wire-level unit published per topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub topic: String,
    pub correlation_id: CorrelationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    /// Position of `persona` within the round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(flatten)]
    pub payload: StreamPayload,
}

impl StreamEvent {
    /// An event scoped to the persona at `index`.
    pub fn for_persona(
        topic: impl Into<String>,
        correlation_id: CorrelationId,
        persona: &Persona,
        index: usize,
        payload: StreamPayload,
    ) -> Self {
        Self {
            topic: topic.into(),
            correlation_id,
            persona: Some(persona.clone()),
            index: Some(index),
            payload,
        }
    }

    /// An event about the round as a whole.
    pub fn for_round(
        topic: impl Into<String>,
        correlation_id: CorrelationId,
        payload: StreamPayload,
    ) -> Self {
        Self {
            topic: topic.into(),
            correlation_id,
            persona: None,
            index: None,
            payload,
        }
    }

    pub fn kind(&self) -> StreamEventKind {
        match self.payload {
            StreamPayload::Token { .. } => StreamEventKind::Token,
            StreamPayload::PersonaStarted => StreamEventKind::PersonaStarted,
            StreamPayload::PersonaCompleted { .. } => StreamEventKind::PersonaCompleted,
            StreamPayload::PersonaFailed { .. } => StreamEventKind::PersonaFailed,
            StreamPayload::RoundCompleted { .. } => StreamEventKind::RoundCompleted,
            StreamPayload::RoundCancelled { .. } => StreamEventKind::RoundCancelled,
            StreamPayload::RoundAborted { .. } => StreamEventKind::RoundAborted,
        }
    }

    /// Returns true if no further events follow for this round.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            StreamEventKind::RoundCompleted
                | StreamEventKind::RoundCancelled
                | StreamEventKind::RoundAborted
                | StreamEventKind::PersonaFailed
        )
    }
}
