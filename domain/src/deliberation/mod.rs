//! Deliberation subdomain.
//!
//! - [`entities::DeliberationRound`]: the ephemeral state of one round
//! - [`value_objects::AgentContext`]: per-invocation metadata for the agent backend
//! - [`value_objects::PersonaResponse`]: one persona's answer within a round

pub mod entities;
pub mod value_objects;
