//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cancel_round;
pub mod deliberate;
pub mod deliberate_streaming;
pub mod launch_round;
pub mod round_cancellation;

#[cfg(test)]
pub(crate) mod test_support;
