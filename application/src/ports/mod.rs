//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_gateway;
pub mod cancellation_store;
pub mod composite_publisher;
pub mod conversation_logger;
pub mod event_publisher;
pub mod progress;
