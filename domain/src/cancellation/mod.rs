//! Cancellation subdomain.
//!
//! - [`key::CancellationKey`]: the storage key derived from a topic

pub mod key;
