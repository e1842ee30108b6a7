//! Deliberate use case
//!
//! Runs one round synchronously: every persona is invoked in order against a
//! shared session and the ordered responses are returned to the caller.

use crate::ports::agent_gateway::{AgentGateway, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{DeliberationProgress, NoProgress};
use serde_json::json;
use std::sync::Arc;
use summit_domain::{DeliberationResult, DeliberationRound, DomainError, Persona, PersonaResponse};
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};

/// Errors that can occur during a synchronous round
#[derive(Error, Debug)]
pub enum DeliberateError {
    #[error("Persona {persona} failed: {source}")]
    Gateway {
        persona: Persona,
        #[source]
        source: GatewayError,
    },

    #[error("Round state error: {0}")]
    Round(#[from] DomainError),
}

impl DeliberateError {
    /// The persona whose invocation aborted the round, if any
    pub fn persona(&self) -> Option<&Persona> {
        match self {
            DeliberateError::Gateway { persona, .. } => Some(persona),
            DeliberateError::Round(_) => None,
        }
    }
}

/// Input for the Deliberate use case
#[derive(Debug, Clone)]
pub struct DeliberateInput {
    /// The user's message, passed to every persona unchanged
    pub message: String,
    /// Backend session shared by all personas (`None` = one-shot calls)
    pub session_id: Option<String>,
    /// Personas in speaking order
    pub personas: Vec<Persona>,
}

impl DeliberateInput {
    pub fn new<P: Into<Persona>>(
        message: impl Into<String>,
        personas: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            personas: personas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Use case for running a synchronous round
///
/// No retries and no cancellation: the caller is still waiting for the
/// response, and a single failed invocation aborts the whole round.
pub struct DeliberateUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: AgentGateway + 'static> DeliberateUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: DeliberateInput,
    ) -> Result<DeliberationResult, DeliberateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: DeliberateInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationResult, DeliberateError> {
        let round = DeliberationRound::start(input.message, input.session_id, input.personas);
        if round.personas().is_empty() {
            return Ok(round.into_result());
        }

        let span = info_span!("deliberation", correlation_id = %round.correlation_id());
        self.run(round, progress).instrument(span).await
    }

    async fn run(
        &self,
        mut round: DeliberationRound,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationResult, DeliberateError> {
        let personas = round.personas().to_vec();
        info!(
            personas = personas.len(),
            session_id = round.session_id().unwrap_or("-"),
            "Deliberation started"
        );
        progress.on_round_start(personas.len());
        self.logger.log(ConversationEvent::new(
            "round_started",
            json!({
                "correlation_id": round.correlation_id(),
                "session_id": round.session_id(),
                "message": round.message(),
                "personas": personas,
                "mode": "sync",
            }),
        ));

        for (index, persona) in personas.iter().enumerate() {
            progress.on_persona_start(persona, index);
            debug!(%persona, index, "Invoking persona");

            let context = round.context_for(persona);
            let result = self
                .gateway
                .invoke(round.message(), &context, round.session_id())
                .await;

            match result {
                Ok(reply) => {
                    info!(
                        %persona,
                        index,
                        bytes = reply.text.len(),
                        has_objective = reply.has_objective,
                        elapsed_ms = round.elapsed_ms(),
                        "Persona responded"
                    );
                    progress.on_persona_complete(persona, true);
                    self.logger.log(ConversationEvent::new(
                        "persona_response",
                        json!({
                            "correlation_id": round.correlation_id(),
                            "persona": persona,
                            "index": index,
                            "text": reply.text,
                            "has_objective": reply.has_objective,
                        }),
                    ));
                    round.record(PersonaResponse::from_reply(persona.clone(), reply))?;
                }
                Err(e) => {
                    // Partial responses are only logged; the caller gets the error.
                    let collected: Vec<&str> =
                        round.responses().iter().map(|r| r.persona.as_str()).collect();
                    warn!(
                        %persona,
                        index,
                        error = %e,
                        elapsed_ms = round.elapsed_ms(),
                        completed = round.responses().len(),
                        collected = ?collected,
                        "Persona failed, aborting deliberation"
                    );
                    progress.on_persona_complete(persona, false);
                    progress.on_round_complete(false);
                    self.logger.log(ConversationEvent::new(
                        "persona_failed",
                        json!({
                            "correlation_id": round.correlation_id(),
                            "persona": persona,
                            "index": index,
                            "error": e.to_string(),
                            "elapsed_ms": round.elapsed_ms(),
                            "responses": round.responses(),
                        }),
                    ));
                    return Err(DeliberateError::Gateway {
                        persona: persona.clone(),
                        source: e,
                    });
                }
            }
        }

        let result = round.into_result();
        info!(
            responses = result.responses.len(),
            elapsed_ms = result.elapsed_ms,
            "Deliberation completed"
        );
        progress.on_round_complete(true);
        self.logger.log(ConversationEvent::new(
            "round_completed",
            json!({
                "correlation_id": result.correlation_id,
                "responses": result.responses.len(),
                "elapsed_ms": result.elapsed_ms,
            }),
        ));
        Ok(result)
    }
}
