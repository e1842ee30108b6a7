//! Event publishers
//!
//! - [`BroadcastEventHub`]: in-process topic fan-out for local subscribers
//! - [`MercurePublisher`]: forwards events to a Mercure-compatible HTTP hub

mod broadcast;
mod mercure;

pub use broadcast::BroadcastEventHub;
pub use mercure::MercurePublisher;
