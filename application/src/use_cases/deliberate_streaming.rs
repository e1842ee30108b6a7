//! Streaming deliberation use case
//!
//! Runs a round after the caller has already been acknowledged. Nothing is
//! returned to the caller: every token and lifecycle step is published to the
//! round's topic, and cancellation requests are honoured between personas and
//! on every streamed fragment.
//!
//! ```text
//! for each persona (in order):
//!   cancelled? ──yes──> round_cancelled, stop
//!   persona_started
//!   invoke_streaming ─ fragment ─> token
//!     cancelled? ──yes──> stop stream, round_cancelled
//!   ok  ──> persona_completed
//!   err ──> persona_failed, stop
//! round_completed
//! ```
//!
//! The cancellation entry is cleared on every exit path.

use crate::ports::agent_gateway::{AgentGateway, FragmentObserver, StreamControl};
use crate::ports::cancellation_store::CancellationSignalStore;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::event_publisher::EventPublisher;
use crate::use_cases::round_cancellation::RoundCancellation;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use summit_domain::{
    AgentFragment, CorrelationId, DeliberationRound, Persona, PersonaResponse, StreamEvent,
    StreamPayload,
};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, trace, warn};

/// Input for a streaming round
#[derive(Debug, Clone)]
pub struct StreamingInput {
    pub message: String,
    pub session_id: Option<String>,
    /// Topic every event of this round is published to
    pub topic: String,
    /// Personas in speaking order
    pub personas: Vec<Persona>,
}

impl StreamingInput {
    pub fn new<P: Into<Persona>>(
        message: impl Into<String>,
        topic: impl Into<String>,
        personas: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            message: message.into(),
            session_id: None,
            topic: topic.into(),
            personas: personas.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Topic name used when the caller does not supply one: the session id
    /// when there is one, otherwise a fresh random suffix.
    pub fn topic_for(prefix: &str, session_id: Option<&str>) -> String {
        match session_id {
            Some(session) if !session.is_empty() => format!("{prefix}{session}"),
            _ => format!("{prefix}{}", CorrelationId::new()),
        }
    }
}

/// How a streaming round ended.
///
/// Subscribers learn this through the terminal event; the value is returned
/// for the hosting task's logs and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Completed { responses: usize },
    Cancelled { completed: usize },
    Failed { persona: Persona, message: String },
}

/// Use case for running a streaming round
pub struct StreamingDeliberateUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    publisher: Arc<dyn EventPublisher>,
    store: Arc<dyn CancellationSignalStore>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: AgentGateway + 'static> StreamingDeliberateUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        publisher: Arc<dyn EventPublisher>,
        store: Arc<dyn CancellationSignalStore>,
    ) -> Self {
        Self {
            gateway,
            publisher,
            store,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the round with a fresh local cancellation token
    pub async fn execute(&self, input: StreamingInput) -> RoundOutcome {
        self.execute_with_token(input, CancellationToken::new()).await
    }

    /// Run the round; tripping `token` cancels it like a stored cancel request
    pub async fn execute_with_token(
        &self,
        input: StreamingInput,
        token: CancellationToken,
    ) -> RoundOutcome {
        self.execute_correlated(input, token, CorrelationId::new()).await
    }

    /// Run the round under a correlation id chosen by the caller
    pub async fn execute_correlated(
        &self,
        input: StreamingInput,
        token: CancellationToken,
        correlation_id: CorrelationId,
    ) -> RoundOutcome {
        let StreamingInput {
            message,
            session_id,
            topic,
            personas,
        } = input;

        let mut round = DeliberationRound::start(message, session_id, personas)
            .with_correlation_id(correlation_id);
        let cancellation = RoundCancellation::new(Arc::clone(&self.store), topic.clone(), token);
        let events = RoundEvents {
            publisher: Arc::clone(&self.publisher),
            topic: topic.clone(),
            correlation_id,
        };

        let span = info_span!("deliberation", correlation_id = %correlation_id, topic = %topic);
        async {
            let outcome = self.run(&mut round, &events, &cancellation).await;
            self.clear_entry(&topic).await;
            self.log_outcome(&round, &outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Close a round whose task died before reaching a terminal event.
    ///
    /// Publishes `round_aborted` and clears the topic's cancellation entry.
    pub async fn abort(&self, topic: &str, correlation_id: CorrelationId, reason: &str) {
        let events = RoundEvents {
            publisher: Arc::clone(&self.publisher),
            topic: topic.to_string(),
            correlation_id,
        };
        events
            .round(StreamPayload::RoundAborted {
                message: reason.to_string(),
            })
            .await;
        self.clear_entry(topic).await;
        self.logger.log(ConversationEvent::new(
            "round_aborted",
            json!({
                "correlation_id": correlation_id,
                "topic": topic,
                "error": reason,
            }),
        ));
    }

    async fn clear_entry(&self, topic: &str) {
        if let Err(e) = self.store.clear(topic).await {
            warn!(topic, error = %e, "Failed to clear cancellation entry");
        }
    }

    async fn run(
        &self,
        round: &mut DeliberationRound,
        events: &RoundEvents,
        cancellation: &RoundCancellation,
    ) -> RoundOutcome {
        let personas = round.personas().to_vec();
        info!(
            personas = personas.len(),
            session_id = round.session_id().unwrap_or("-"),
            "Streaming deliberation started"
        );
        self.logger.log(ConversationEvent::new(
            "round_started",
            json!({
                "correlation_id": round.correlation_id(),
                "session_id": round.session_id(),
                "topic": events.topic,
                "message": round.message(),
                "personas": personas,
                "mode": "stream",
            }),
        ));

        for (index, persona) in personas.iter().enumerate() {
            if cancellation.is_cancelled().await {
                return self.cancel_round(round, events).await;
            }

            events
                .persona(persona, index, StreamPayload::PersonaStarted)
                .await;
            debug!(%persona, index, "Streaming persona");

            let context = round.context_for(persona);
            let mut forwarder = TokenForwarder {
                events,
                cancellation,
                persona,
                index,
                fragments: 0,
                cancelled: false,
            };
            let result = self
                .gateway
                .invoke_streaming(
                    round.message(),
                    &context,
                    round.session_id(),
                    &mut forwarder,
                )
                .await;

            if forwarder.cancelled {
                debug!(%persona, fragments = forwarder.fragments, "Stream stopped by cancellation");
                return self.cancel_round(round, events).await;
            }

            match result {
                Ok(reply) => {
                    info!(
                        %persona,
                        index,
                        fragments = forwarder.fragments,
                        bytes = reply.text.len(),
                        elapsed_ms = round.elapsed_ms(),
                        "Persona completed"
                    );
                    events
                        .persona(
                            persona,
                            index,
                            StreamPayload::PersonaCompleted {
                                text: reply.text.clone(),
                                has_objective: reply.has_objective,
                            },
                        )
                        .await;
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
                    let response = PersonaResponse::from_reply(persona.clone(), reply);
                    if let Err(e) = round.record(response) {
                        error!(%persona, error = %e, "Round state rejected response");
                        let message = e.to_string();
                        return self.fail_round(round, events, persona, index, message).await;
                    }
                }
                Err(e) => {
                    warn!(
                        %persona,
                        index,
                        error = %e,
                        elapsed_ms = round.elapsed_ms(),
                        completed = round.responses().len(),
                        "Persona failed, stopping deliberation"
                    );
                    let message = e.to_string();
                    return self.fail_round(round, events, persona, index, message).await;
                }
            }
        }

        let responses = round.responses().len();
        events.round(StreamPayload::RoundCompleted { responses }).await;
        info!(responses, elapsed_ms = round.elapsed_ms(), "Streaming deliberation completed");
        RoundOutcome::Completed { responses }
    }

    async fn cancel_round(&self, round: &DeliberationRound, events: &RoundEvents) -> RoundOutcome {
        let completed = round.responses().len();
        info!(completed, elapsed_ms = round.elapsed_ms(), "Deliberation cancelled");
        events.round(StreamPayload::RoundCancelled { completed }).await;
        RoundOutcome::Cancelled { completed }
    }

    async fn fail_round(
        &self,
        round: &DeliberationRound,
        events: &RoundEvents,
        persona: &Persona,
        index: usize,
        message: String,
    ) -> RoundOutcome {
        events
            .persona(
                persona,
                index,
                StreamPayload::PersonaFailed {
                    message: message.clone(),
                },
            )
            .await;
        self.logger.log(ConversationEvent::new(
            "persona_failed",
            json!({
                "correlation_id": round.correlation_id(),
                "persona": persona,
                "index": index,
                "error": message,
                "elapsed_ms": round.elapsed_ms(),
            }),
        ));
        RoundOutcome::Failed {
            persona: persona.clone(),
            message,
        }
    }

    fn log_outcome(&self, round: &DeliberationRound, outcome: &RoundOutcome) {
        let event_type = match outcome {
            RoundOutcome::Completed { .. } => "round_completed",
            RoundOutcome::Cancelled { .. } => "round_cancelled",
            RoundOutcome::Failed { .. } => "round_failed",
        };
        self.logger.log(ConversationEvent::new(
            event_type,
            json!({
                "correlation_id": round.correlation_id(),
                "responses": round.responses().len(),
                "elapsed_ms": round.elapsed_ms(),
            }),
        ));
    }
}

/// Publishes one round's events to its topic, logging failures.
struct RoundEvents {
    publisher: Arc<dyn EventPublisher>,
    topic: String,
    correlation_id: CorrelationId,
}

impl RoundEvents {
    async fn persona(&self, persona: &Persona, index: usize, payload: StreamPayload) {
        let event =
            StreamEvent::for_persona(&self.topic, self.correlation_id, persona, index, payload);
        self.send(event).await;
    }

    async fn round(&self, payload: StreamPayload) {
        let event = StreamEvent::for_round(&self.topic, self.correlation_id, payload);
        self.send(event).await;
    }

    async fn send(&self, event: StreamEvent) {
        if let Err(e) = self.publisher.publish(&self.topic, &event).await {
            warn!(kind = %event.kind(), error = %e, "Failed to publish stream event");
        }
    }
}

/// Forwards text fragments as `token` events and checks for cancellation
/// after each fragment.
struct TokenForwarder<'a> {
    events: &'a RoundEvents,
    cancellation: &'a RoundCancellation,
    persona: &'a Persona,
    index: usize,
    fragments: usize,
    cancelled: bool,
}

#[async_trait]
impl FragmentObserver for TokenForwarder<'_> {
    async fn on_fragment(&mut self, fragment: &AgentFragment) -> StreamControl {
        if self.cancelled {
            return StreamControl::Stop;
        }
        self.fragments += 1;

        match fragment {
            AgentFragment::Text { content } => {
                self.events
                    .persona(
                        self.persona,
                        self.index,
                        StreamPayload::Token {
                            content: content.clone(),
                        },
                    )
                    .await;
            }
            other => trace!(persona = %self.persona, fragment = ?other, "Non-text fragment"),
        }

        if self.cancellation.is_cancelled().await {
            self.cancelled = true;
            return StreamControl::Stop;
        }
        StreamControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MemoryStore, RecordingPublisher, Script, ScriptedGateway};
    use summit_domain::StreamEventKind::*;

    const TOPIC: &str = "summit/session-1";

    fn summit_gateway() -> ScriptedGateway {
        ScriptedGateway::new()
            .with_script("gandalf", Script::reply(&["Fly, ", "you fools!"]))
            .with_script("terminator", Script::reply(&["I'll ", "be ", "back."]))
            .with_script("ships_cat", Script::reply_with_objective(&["Meow."]))
    }

    fn input() -> StreamingInput {
        StreamingInput::new(
            "Should we migrate to microservices?",
            TOPIC,
            ["gandalf", "terminator", "ships_cat"],
        )
        .with_session("session-1")
    }

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        publisher: Arc<RecordingPublisher>,
        store: Arc<MemoryStore>,
        use_case: StreamingDeliberateUseCase<ScriptedGateway>,
    }

    fn harness(
        gateway: ScriptedGateway,
        publisher: RecordingPublisher,
        store: Arc<MemoryStore>,
    ) -> Harness {
        let gateway = Arc::new(gateway);
        let publisher = Arc::new(publisher);
        let use_case = StreamingDeliberateUseCase::new(
            Arc::clone(&gateway),
            Arc::clone(&publisher) as Arc<dyn EventPublisher>,
            Arc::clone(&store) as Arc<dyn CancellationSignalStore>,
        );
        Harness {
            gateway,
            publisher,
            store,
            use_case,
        }
    }

    #[tokio::test]
    async fn test_full_round_publishes_tokens_and_lifecycle() {
        let h = harness(summit_gateway(), RecordingPublisher::new(), Arc::new(MemoryStore::new()));

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(outcome, RoundOutcome::Completed { responses: 3 });
        assert_eq!(
            h.publisher.kinds(),
            vec![
                PersonaStarted,
                Token,
                Token,
                PersonaCompleted,
                PersonaStarted,
                Token,
                Token,
                Token,
                PersonaCompleted,
                PersonaStarted,
                Token,
                PersonaCompleted,
                RoundCompleted,
            ]
        );
        assert!(h.publisher.topics().iter().all(|t| t == TOPIC));

        let events = h.publisher.events();
        let correlation = events[0].correlation_id;
        assert!(events.iter().all(|e| e.correlation_id == correlation));
        assert_eq!(
            events[3].payload,
            StreamPayload::PersonaCompleted {
                text: "Fly, you fools!".to_string(),
                has_objective: false,
            }
        );
        assert_eq!(events[3].index, Some(0));
        assert_eq!(events[11].persona.as_ref().map(|p| p.as_str()), Some("ships_cat"));
        assert_eq!(events[11].index, Some(2));
        assert_eq!(
            events[11].payload,
            StreamPayload::PersonaCompleted {
                text: "Meow.".to_string(),
                has_objective: true,
            }
        );
        assert_eq!(events[12].persona, None);

        let calls = h.gateway.calls();
        assert!(calls.iter().all(|c| c.streaming));
        assert!(calls.iter().all(|c| c.session_id.as_deref() == Some("session-1")));
        assert!(calls.iter().all(|c| c.context.correlation_id() == correlation));
    }

    #[tokio::test]
    async fn test_tokens_rebuild_transcript_per_persona() {
        let h = harness(summit_gateway(), RecordingPublisher::new(), Arc::new(MemoryStore::new()));

        h.use_case.execute(input()).await;

        let mut transcript = vec![String::new(); 3];
        for event in h.publisher.events() {
            if let StreamPayload::Token { content } = &event.payload {
                transcript[event.index.unwrap()].push_str(content);
            }
        }
        assert_eq!(transcript, vec!["Fly, you fools!", "I'll be back.", "Meow."]);
    }

    #[tokio::test]
    async fn test_cancel_on_last_fragment_skips_remaining_personas() {
        let store = Arc::new(MemoryStore::new());
        let hook_store = Arc::clone(&store);
        // Lands just before gandalf's last fragment, so the check after it stops the round
        let gateway = summit_gateway().with_hook(
            "gandalf",
            1,
            Arc::new(move || hook_store.cancel_now(TOPIC)),
        );
        let h = harness(gateway, RecordingPublisher::new(), store);

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(outcome, RoundOutcome::Cancelled { completed: 0 });
        assert_eq!(h.gateway.invoked_personas(), vec!["gandalf"]);
        assert_eq!(
            h.publisher.kinds(),
            vec![PersonaStarted, Token, Token, RoundCancelled]
        );
    }

    #[tokio::test]
    async fn test_cancel_between_personas_never_invokes_next() {
        let store = Arc::new(MemoryStore::new());
        let gateway = ScriptedGateway::new()
            .with_script("gandalf", Script::reply(&["Fly."]))
            .with_script("terminator", Script::reply(&["No."]));
        let h = harness(gateway, RecordingPublisher::new(), Arc::clone(&store));

        // Wrap the publisher so the cancel lands right after persona 1 completes
        struct CancelOnComplete {
            inner: Arc<RecordingPublisher>,
            store: Arc<MemoryStore>,
        }

        #[async_trait]
        impl EventPublisher for CancelOnComplete {
            async fn publish(
                &self,
                topic: &str,
                event: &StreamEvent,
            ) -> Result<(), crate::ports::event_publisher::PublishError> {
                if event.kind() == PersonaCompleted {
                    self.store.cancel_now(topic);
                }
                self.inner.publish(topic, event).await
            }
        }

        let use_case = StreamingDeliberateUseCase::new(
            Arc::clone(&h.gateway),
            Arc::new(CancelOnComplete {
                inner: Arc::clone(&h.publisher),
                store: Arc::clone(&store),
            }),
            Arc::clone(&store) as Arc<dyn CancellationSignalStore>,
        );

        let outcome = use_case
            .execute(StreamingInput::new(
                "Hi",
                TOPIC,
                ["gandalf", "terminator", "ships_cat"],
            ))
            .await;

        assert_eq!(outcome, RoundOutcome::Cancelled { completed: 1 });
        assert_eq!(h.gateway.invoked_personas(), vec!["gandalf"]);
        assert_eq!(
            h.publisher.kinds(),
            vec![PersonaStarted, Token, PersonaCompleted, RoundCancelled]
        );
        let last = h.publisher.events().pop().unwrap();
        assert_eq!(last.payload, StreamPayload::RoundCancelled { completed: 1 });
    }

    #[tokio::test]
    async fn test_cancel_mid_stream_stops_consuming_fragments() {
        let store = Arc::new(MemoryStore::new());
        let hook_store = Arc::clone(&store);
        let gateway = summit_gateway().with_hook(
            "terminator",
            1,
            Arc::new(move || hook_store.cancel_now(TOPIC)),
        );
        let h = harness(gateway, RecordingPublisher::new(), store);

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(outcome, RoundOutcome::Cancelled { completed: 1 });
        // "I'll " and "be " were delivered; "back." never was
        assert_eq!(
            h.publisher.kinds(),
            vec![
                PersonaStarted,
                Token,
                Token,
                PersonaCompleted,
                PersonaStarted,
                Token,
                Token,
                RoundCancelled,
            ]
        );
        assert_eq!(h.gateway.invoked_personas(), vec!["gandalf", "terminator"]);
    }

    #[tokio::test]
    async fn test_already_cancelled_topic_publishes_only_cancellation() {
        let store = Arc::new(MemoryStore::new());
        store.cancel_now(TOPIC);
        let h = harness(summit_gateway(), RecordingPublisher::new(), store);

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(outcome, RoundOutcome::Cancelled { completed: 0 });
        assert!(h.gateway.calls().is_empty());
        assert_eq!(h.publisher.kinds(), vec![RoundCancelled]);
    }

    #[tokio::test]
    async fn test_local_token_cancels_round() {
        let h = harness(summit_gateway(), RecordingPublisher::new(), Arc::new(MemoryStore::new()));
        let token = CancellationToken::new();
        token.cancel();

        let outcome = h.use_case.execute_with_token(input(), token).await;

        assert_eq!(outcome, RoundOutcome::Cancelled { completed: 0 });
        assert!(h.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_publishes_persona_failed_and_stops() {
        let gateway =
            summit_gateway().with_script("terminator", Script::Fail("backend 502".to_string()));
        let h = harness(gateway, RecordingPublisher::new(), Arc::new(MemoryStore::new()));

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(
            outcome,
            RoundOutcome::Failed {
                persona: Persona::from("terminator"),
                message: "Request failed: backend 502".to_string(),
            }
        );
        assert_eq!(h.gateway.invoked_personas(), vec!["gandalf", "terminator"]);
        assert_eq!(
            h.publisher.kinds(),
            vec![
                PersonaStarted,
                Token,
                Token,
                PersonaCompleted,
                PersonaStarted,
                PersonaFailed,
            ]
        );
        let failed = h.publisher.events().pop().unwrap();
        assert_eq!(failed.index, Some(1));
        assert!(failed.is_terminal());
    }

    #[tokio::test]
    async fn test_clears_cancellation_entry_on_every_exit() {
        // completed
        let h = harness(summit_gateway(), RecordingPublisher::new(), Arc::new(MemoryStore::new()));
        h.use_case.execute(input()).await;
        assert_eq!(h.store.clears(), vec![TOPIC.to_string()]);

        // cancelled
        let store = Arc::new(MemoryStore::new());
        store.cancel_now(TOPIC);
        let h = harness(summit_gateway(), RecordingPublisher::new(), store);
        h.use_case.execute(input()).await;
        assert_eq!(h.store.clears(), vec![TOPIC.to_string()]);
        assert!(!h.store.contains(TOPIC));

        // failed
        let gateway = summit_gateway().with_script("gandalf", Script::Fail("down".to_string()));
        let h = harness(gateway, RecordingPublisher::new(), Arc::new(MemoryStore::new()));
        h.use_case.execute(input()).await;
        assert_eq!(h.store.clears(), vec![TOPIC.to_string()]);
    }

    #[tokio::test]
    async fn test_publish_failures_do_not_stop_round() {
        let publisher = RecordingPublisher::new().failing_on(Token);
        let h = harness(summit_gateway(), publisher, Arc::new(MemoryStore::new()));

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(outcome, RoundOutcome::Completed { responses: 3 });
        // 13 attempts, the 6 token events failed
        assert_eq!(h.publisher.attempts(), 13);
        assert!(!h.publisher.kinds().contains(&Token));
        assert_eq!(h.publisher.kinds().last(), Some(&RoundCompleted));
    }

    #[tokio::test]
    async fn test_store_outage_does_not_stop_round() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads();
        let h = harness(summit_gateway(), RecordingPublisher::new(), store);

        let outcome = h.use_case.execute(input()).await;

        assert_eq!(outcome, RoundOutcome::Completed { responses: 3 });
    }

    #[test]
    fn test_topic_for_prefers_session_id() {
        assert_eq!(
            StreamingInput::topic_for("summit/", Some("abc")),
            "summit/abc"
        );
        let generated = StreamingInput::topic_for("summit/", None);
        assert!(generated.starts_with("summit/"));
        assert_eq!(generated.len(), "summit/".len() + 36);
        assert_ne!(generated, StreamingInput::topic_for("summit/", Some("")));
    }

    #[tokio::test]
    async fn test_empty_persona_list_completes_immediately() {
        let h = harness(summit_gateway(), RecordingPublisher::new(), Arc::new(MemoryStore::new()));

        let outcome = h
            .use_case
            .execute(StreamingInput::new("Hi", TOPIC, Vec::<Persona>::new()))
            .await;

        assert_eq!(outcome, RoundOutcome::Completed { responses: 0 });
        assert_eq!(h.publisher.kinds(), vec![RoundCompleted]);
    }
}
