//! Value objects for deliberation rounds

use crate::core::correlation::CorrelationId;
use crate::core::persona::Persona;
use serde::{Deserialize, Serialize};

/// Metadata passed to the agent backend with every persona invocation.
///
/// Built fresh for each invocation and immutable afterwards. The full list
/// of active personas lets the backend know who else takes part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentContext {
    persona: Persona,
    correlation_id: CorrelationId,
    active_personas: Vec<Persona>,
}

impl AgentContext {
    pub fn new(
        persona: Persona,
        correlation_id: CorrelationId,
        active_personas: Vec<Persona>,
    ) -> Self {
        Self {
            persona,
            correlation_id,
            active_personas,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn active_personas(&self) -> &[Persona] {
        &self.active_personas
    }
}

/// What the agent backend returns for one persona invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentReply {
    pub text: String,
    /// Whether the backend gave this persona a secret objective for the round.
    #[serde(default)]
    pub has_objective: bool,
}

impl AgentReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            has_objective: false,
        }
    }

    pub fn with_objective(mut self) -> Self {
        self.has_objective = true;
        self
    }
}

/// One persona's completed answer within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub persona: Persona,
    pub text: String,
    pub has_objective: bool,
}

impl PersonaResponse {
    pub fn from_reply(persona: Persona, reply: AgentReply) -> Self {
        Self {
            persona,
            text: reply.text,
            has_objective: reply.has_objective,
        }
    }
}

/// Result of a fully completed round, responses in persona order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationResult {
    pub correlation_id: CorrelationId,
    pub session_id: Option<String>,
    pub message: String,
    pub responses: Vec<PersonaResponse>,
    pub elapsed_ms: u64,
}

impl DeliberationResult {
    /// Personas in the order they answered
    pub fn personas(&self) -> impl Iterator<Item = &Persona> {
        self.responses.iter().map(|r| &r.persona)
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}
