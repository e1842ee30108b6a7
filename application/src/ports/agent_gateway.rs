//! Agent Gateway port
//!
//! Defines the interface for invoking a persona on the remote agent backend.

use async_trait::async_trait;
use summit_domain::{AgentContext, AgentFragment, AgentReply};
use thiserror::Error;

/// Errors that can occur during agent gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Whether the gateway should keep streaming after a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamControl {
    Continue,
    Stop,
}

/// Receives fragments while a persona's reply is streamed.
///
/// Returning [`StreamControl::Stop`] makes the gateway stop reading the
/// stream; no further fragments are delivered for that call.
#[async_trait]
pub trait FragmentObserver: Send {
    async fn on_fragment(&mut self, fragment: &AgentFragment) -> StreamControl;
}

/// Gateway to the agent backend
///
/// This port defines how the application layer invokes personas.
/// Implementations (adapters) live in the infrastructure layer. Timeouts
/// and retry policy, if any, belong to the implementation.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Invoke a persona and wait for the complete reply.
    ///
    /// `session_id` ties the call to a backend-held conversation; `None`
    /// makes it a one-shot call without memory.
    async fn invoke(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
    ) -> Result<AgentReply, GatewayError>;

    /// Invoke a persona and stream its reply through `observer`.
    ///
    /// When the observer asks to stop, the gateway returns the text gathered
    /// so far. Default implementation calls `invoke()` and delivers the
    /// whole reply as a single fragment.
    async fn invoke_streaming(
        &self,
        message: &str,
        context: &AgentContext,
        session_id: Option<&str>,
        observer: &mut dyn FragmentObserver,
    ) -> Result<AgentReply, GatewayError> {
        let reply = self.invoke(message, context, session_id).await?;
        if !reply.text.is_empty() {
            let fragment = AgentFragment::text(reply.text.clone());
            observer.on_fragment(&fragment).await;
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_domain::{CorrelationId, Persona};

    struct EchoGateway;

    #[async_trait]
    impl AgentGateway for EchoGateway {
        async fn invoke(
            &self,
            message: &str,
            context: &AgentContext,
            _session_id: Option<&str>,
        ) -> Result<AgentReply, GatewayError> {
            Ok(AgentReply::new(format!("{}: {}", context.persona(), message)))
        }
    }

    #[derive(Default)]
    struct Collect(Vec<AgentFragment>);

    #[async_trait]
    impl FragmentObserver for Collect {
        async fn on_fragment(&mut self, fragment: &AgentFragment) -> StreamControl {
            self.0.push(fragment.clone());
            StreamControl::Continue
        }
    }

    #[tokio::test]
    async fn test_default_streaming_delivers_single_fragment() {
        let persona = Persona::from("gandalf");
        let context = AgentContext::new(persona.clone(), CorrelationId::new(), vec![persona]);
        let mut observer = Collect::default();

        let reply = EchoGateway
            .invoke_streaming("hello", &context, None, &mut observer)
            .await
            .unwrap();

        assert_eq!(reply.text, "gandalf: hello");
        assert_eq!(observer.0, vec![AgentFragment::text("gandalf: hello")]);
    }
}
