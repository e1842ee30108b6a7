//! Core domain concepts shared across all subdomains.
//!
//! - [`persona::Persona`]: an opaque persona identifier
//! - [`correlation::CorrelationId`]: the per-round trace identifier
//! - [`error::DomainError`]: domain-level errors

pub mod correlation;
pub mod error;
pub mod persona;
