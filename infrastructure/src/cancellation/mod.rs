//! Cancellation signal storage

mod memory;

pub use memory::InMemoryCancellationStore;
