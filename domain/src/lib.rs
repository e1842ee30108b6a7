//! Domain layer for summit
//!
//! This crate contains the core entities and value objects of a deliberation.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! A round poses one message to an ordered panel of personas. Personas answer
//! strictly in order, one at a time, sharing a backend session so that each
//! one sees what the previous ones said.
//!
//! ## Streaming
//!
//! In streaming mode the caller only receives a [`StreamingAck`]; the round's
//! transcript is delivered as [`StreamEvent`]s on a pub/sub topic.

pub mod cancellation;
pub mod core;
pub mod deliberation;
pub mod stream;

// Re-export commonly used types
pub use cancellation::key::{CancellationKey, DEFAULT_KEY_PREFIX};
pub use core::{correlation::CorrelationId, error::DomainError, persona::Persona};
pub use deliberation::{
    entities::DeliberationRound,
    value_objects::{AgentContext, AgentReply, DeliberationResult, PersonaResponse},
};
pub use stream::{
    ack::StreamingAck,
    event::{StreamEvent, StreamEventKind, StreamPayload},
    fragment::AgentFragment,
};
