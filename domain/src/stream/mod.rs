//! Streaming subdomain.
//!
//! - [`fragment::AgentFragment`]: an incremental unit streamed by the agent backend
//! - [`event::StreamEvent`]: the unit published to a round's topic
//! - [`ack::StreamingAck`]: what the caller receives before the round runs

pub mod ack;
pub mod event;
pub mod fragment;
