//! Deliberation round entity

use super::value_objects::{AgentContext, DeliberationResult, PersonaResponse};
use crate::core::correlation::CorrelationId;
use crate::core::error::DomainError;
use crate::core::persona::Persona;
use std::time::Instant;

/// The state of one round, owned by a single execution path.
///
/// Responses are recorded strictly in persona order; the round is never
/// shared between tasks, so no locking is involved.
#[derive(Debug, Clone)]
pub struct DeliberationRound {
    correlation_id: CorrelationId,
    session_id: Option<String>,
    message: String,
    personas: Vec<Persona>,
    responses: Vec<PersonaResponse>,
    started_at: Instant,
}

impl DeliberationRound {
    /// Start a round with a freshly generated correlation id.
    pub fn start(
        message: impl Into<String>,
        session_id: Option<String>,
        personas: Vec<Persona>,
    ) -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            session_id,
            message: message.into(),
            personas,
            responses: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Use an id chosen before the round started, so events published
    /// outside the round can still be correlated with it.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn responses(&self) -> &[PersonaResponse] {
        &self.responses
    }

    /// Index of the persona whose turn it is.
    pub fn next_index(&self) -> usize {
        self.responses.len()
    }

    /// The persona whose turn it is, if any remain.
    pub fn next_persona(&self) -> Option<&Persona> {
        self.personas.get(self.responses.len())
    }

    pub fn is_complete(&self) -> bool {
        self.responses.len() == self.personas.len()
    }

    /// Build the invocation context for `persona`.
    pub fn context_for(&self, persona: &Persona) -> AgentContext {
        AgentContext::new(
            persona.clone(),
            self.correlation_id,
            self.personas.clone(),
        )
    }

    /// Record the next persona's response.
    ///
    /// The response must belong to the persona whose turn it is.
    pub fn record(&mut self, response: PersonaResponse) -> Result<(), DomainError> {
        match self.next_persona() {
            None => Err(DomainError::RoundComplete),
            Some(expected) if *expected != response.persona => {
                Err(DomainError::UnknownPersona(response.persona.to_string()))
            }
            Some(_) => {
                self.responses.push(response);
                Ok(())
            }
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    pub fn into_result(self) -> DeliberationResult {
        let elapsed_ms = self.elapsed_ms();
        DeliberationResult {
            correlation_id: self.correlation_id,
            session_id: self.session_id,
            message: self.message,
            responses: self.responses,
            elapsed_ms,
        }
    }
}
