//! Background dispatch of streaming rounds
//!
//! The caller gets a [`StreamingAck`] first; the round itself runs on a
//! tracked background task afterwards. [`RoundLauncher::prepare`] builds the
//! acknowledgment without starting anything, so a transport can send it
//! before calling [`PreparedRound::dispatch`].
//!
//! Each round runs in its own task under a supervisor that logs the outcome.
//! When the round task panics or is aborted, the supervisor publishes
//! `round_aborted` to the topic and clears its cancellation entry, so
//! subscribers always see a terminal event.

use crate::config::DeliberationConfig;
use crate::ports::agent_gateway::AgentGateway;
use crate::use_cases::deliberate_streaming::{
    RoundOutcome, StreamingDeliberateUseCase, StreamingInput,
};
use std::sync::Arc;
use summit_domain::{CorrelationId, Persona, StreamingAck};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Errors from launching a round
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Launcher is shutting down")]
    ShuttingDown,

    #[error("Invalid topic: {0:?}")]
    InvalidTopic(String),
}

/// A request to run a round in the background
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub message: String,
    pub session_id: Option<String>,
    /// Explicit topic; derived from the session id when absent
    pub topic: Option<String>,
    pub personas: Vec<Persona>,
}

impl LaunchRequest {
    pub fn new<P: Into<Persona>>(
        message: impl Into<String>,
        personas: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            topic: None,
            personas: personas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// A validated round whose acknowledgment is ready but which has not started.
pub struct PreparedRound<G: AgentGateway + 'static> {
    ack: StreamingAck,
    input: StreamingInput,
    launcher: RoundLauncher<G>,
}

impl<G: AgentGateway + 'static> PreparedRound<G> {
    pub fn ack(&self) -> &StreamingAck {
        &self.ack
    }

    /// Start the round in the background and hand back the acknowledgment.
    pub fn dispatch(self) -> StreamingAck {
        self.launcher.spawn(self.input);
        self.ack
    }
}

/// Runs streaming rounds on tracked background tasks.
pub struct RoundLauncher<G: AgentGateway + 'static> {
    use_case: Arc<StreamingDeliberateUseCase<G>>,
    topic_prefix: String,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl<G: AgentGateway + 'static> Clone for RoundLauncher<G> {
    fn clone(&self) -> Self {
        Self {
            use_case: Arc::clone(&self.use_case),
            topic_prefix: self.topic_prefix.clone(),
            tracker: self.tracker.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<G: AgentGateway + 'static> RoundLauncher<G> {
    pub fn new(
        use_case: Arc<StreamingDeliberateUseCase<G>>,
        config: &DeliberationConfig,
    ) -> Self {
        Self {
            use_case,
            topic_prefix: config.topic_prefix.clone(),
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Use `token` as the parent of every round's cancellation token.
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Number of rounds still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Validate a request and build its acknowledgment.
    pub fn prepare(&self, request: LaunchRequest) -> Result<PreparedRound<G>, LaunchError> {
        if self.tracker.is_closed() || self.shutdown.is_cancelled() {
            return Err(LaunchError::ShuttingDown);
        }

        let topic = match request.topic {
            Some(topic) if topic.trim().is_empty() => {
                return Err(LaunchError::InvalidTopic(topic));
            }
            Some(topic) => topic,
            None => StreamingInput::topic_for(&self.topic_prefix, request.session_id.as_deref()),
        };

        let ack = StreamingAck::new(request.session_id.clone(), topic.clone());
        let input = StreamingInput {
            message: request.message,
            session_id: request.session_id,
            topic,
            personas: request.personas,
        };
        Ok(PreparedRound {
            ack,
            input,
            launcher: self.clone(),
        })
    }

    /// Prepare and dispatch in one step.
    pub fn launch(&self, request: LaunchRequest) -> Result<StreamingAck, LaunchError> {
        Ok(self.prepare(request)?.dispatch())
    }

    fn spawn(&self, input: StreamingInput) {
        let use_case = Arc::clone(&self.use_case);
        let token = self.shutdown.child_token();
        let topic = input.topic.clone();
        let correlation_id = CorrelationId::new();
        debug!(topic = %topic, %correlation_id, "Dispatching streaming round");

        self.tracker.spawn(async move {
            let round = tokio::spawn({
                let use_case = Arc::clone(&use_case);
                async move {
                    use_case.execute_correlated(input, token, correlation_id).await
                }
            });
            let reason = match round.await {
                Ok(RoundOutcome::Failed { persona, message }) => {
                    warn!(topic = %topic, %persona, error = %message, "Streaming round failed");
                    return;
                }
                Ok(outcome) => {
                    info!(topic = %topic, ?outcome, "Streaming round finished");
                    return;
                }
                Err(e) if e.is_panic() => {
                    error!(topic = %topic, "Streaming round panicked");
                    "round task panicked".to_string()
                }
                Err(e) => {
                    warn!(topic = %topic, error = %e, "Streaming round aborted");
                    e.to_string()
                }
            };
            use_case.abort(&topic, correlation_id, &reason).await;
        });
    }

    /// Stop accepting rounds, cancel the running ones and wait for them.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.shutdown.cancel();
        self.tracker.wait().await;
    }

    /// Stop accepting rounds and wait for the running ones to finish.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
