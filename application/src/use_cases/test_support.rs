//! Scripted doubles shared by the use case tests.

use crate::ports::agent_gateway::{AgentGateway, FragmentObserver, GatewayError, StreamControl};
use crate::ports::cancellation_store::{CancellationSignalStore, CancellationStoreError};
use crate::ports::event_publisher::{EventPublisher, PublishError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use summit_domain::{AgentContext, AgentFragment, AgentReply, StreamEvent, StreamEventKind};

/// What a persona does when invoked
pub(crate) enum Script {
    Reply {
        fragments: Vec<String>,
        has_objective: bool,
    },
    Fail(String),
}

impl Script {
    pub(crate) fn reply(fragments: &[&str]) -> Self {
        Script::Reply {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            has_objective: false,
        }
    }

    pub(crate) fn reply_with_objective(fragments: &[&str]) -> Self {
        Script::Reply {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            has_objective: true,
        }
    }
}

pub(crate) type Hook = Arc<dyn Fn() + Send + Sync>;

/// A recorded gateway call
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub persona: String,
    pub message: String,
    pub session_id: Option<String>,
    pub context: AgentContext,
    pub streaming: bool,
}

/// Mock gateway that replies per persona from a script
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    scripts: HashMap<String, Script>,
    /// (persona, fragment index) → hook run just before that fragment is delivered
    hooks: HashMap<(String, usize), Hook>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_script(mut self, persona: &str, script: Script) -> Self {
        self.scripts.insert(persona.to_string(), script);
        self
    }

    /// Run `hook` right before `persona`'s fragment number `fragment` is
    /// delivered (0 also covers the non-streaming call).
    pub(crate) fn with_hook(mut self, persona: &str, fragment: usize, hook: Hook) -> Self {
        self.hooks.insert((persona.to_string(), fragment), hook);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn invoked_personas(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.persona).collect()
    }

    fn record(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
        streaming: bool,
    ) {
        self.calls.lock().unwrap().push(Invocation {
            persona: context.persona().to_string(),
            message: message.to_string(),
            session_id: session_id.map(str::to_string),
            context: context.clone(),
            streaming,
        });
    }

    fn run_hook(&self, persona: &str, fragment: usize) {
        if let Some(hook) = self.hooks.get(&(persona.to_string(), fragment)) {
            hook();
        }
    }
}

#[async_trait]
impl AgentGateway for ScriptedGateway {
    async fn invoke(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
    ) -> Result<AgentReply, GatewayError> {
        self.record(message, context, session_id, false);
        let persona = context.persona().as_str();
        self.run_hook(persona, 0);
        match self.scripts.get(persona) {
            Some(Script::Reply {
                fragments,
                has_objective,
            }) => Ok(AgentReply {
                text: fragments.concat(),
                has_objective: *has_objective,
            }),
            Some(Script::Fail(e)) => Err(GatewayError::RequestFailed(e.clone())),
            None => Ok(AgentReply::new("(default response)")),
        }
    }

    async fn invoke_streaming(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
        observer: &mut dyn FragmentObserver,
    ) -> Result<AgentReply, GatewayError> {
        self.record(message, context, session_id, true);
        let persona = context.persona().as_str();
        let (fragments, has_objective) = match self.scripts.get(persona) {
            Some(Script::Reply {
                fragments,
                has_objective,
            }) => (fragments.clone(), *has_objective),
            Some(Script::Fail(e)) => {
                self.run_hook(persona, 0);
                return Err(GatewayError::RequestFailed(e.clone()));
            }
            None => (vec!["(default response)".to_string()], false),
        };

        let mut text = String::new();
        for (i, fragment) in fragments.iter().enumerate() {
            self.run_hook(persona, i);
            text.push_str(fragment);
            let control = observer.on_fragment(&AgentFragment::text(fragment.clone())).await;
            if control == StreamControl::Stop {
                break;
            }
        }
        Ok(AgentReply {
            text,
            has_objective,
        })
    }
}

/// Mock publisher that records every event
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    events: Mutex<Vec<(String, StreamEvent)>>,
    failing: HashSet<StreamEventKind>,
    attempts: AtomicUsize,
}

impl RecordingPublisher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fail every publish of `kind` (the event is not recorded)
    pub(crate) fn failing_on(mut self, kind: StreamEventKind) -> Self {
        self.failing.insert(kind);
        self
    }

    pub(crate) fn events(&self) -> Vec<StreamEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub(crate) fn topics(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    pub(crate) fn kinds(&self) -> Vec<StreamEventKind> {
        self.events().iter().map(|e| e.kind()).collect()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, event: &StreamEvent) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&event.kind()) {
            return Err(PublishError::Unavailable("hub offline".to_string()));
        }
        self.events
            .lock()
            .unwrap()
            .push((topic.to_string(), event.clone()));
        Ok(())
    }
}

/// Mock store backed by a set, with synchronous helpers for hooks
#[derive(Default)]
pub(crate) struct MemoryStore {
    cancelled: Mutex<HashSet<String>>,
    fail_reads: AtomicBool,
    clears: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cancel_now(&self, topic: &str) {
        self.cancelled.lock().unwrap().insert(topic.to_string());
    }

    pub(crate) fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub(crate) fn contains(&self, topic: &str) -> bool {
        self.cancelled.lock().unwrap().contains(topic)
    }

    pub(crate) fn clears(&self) -> Vec<String> {
        self.clears.lock().unwrap().clone()
    }
}

#[async_trait]
impl CancellationSignalStore for MemoryStore {
    async fn cancel(&self, topic: &str) -> Result<(), CancellationStoreError> {
        self.cancel_now(topic);
        Ok(())
    }

    async fn is_cancelled(&self, topic: &str) -> Result<bool, CancellationStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CancellationStoreError::Unavailable("cache down".to_string()));
        }
        Ok(self.contains(topic))
    }

    async fn clear(&self, topic: &str) -> Result<(), CancellationStoreError> {
        self.clears.lock().unwrap().push(topic.to_string());
        self.cancelled.lock().unwrap().remove(topic);
        Ok(())
    }
}
