//! Presentation layer for summit
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters and the live stream printer.

pub mod cli;
pub mod output;
pub mod progress;
pub mod stream;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use stream::printer::StreamPrinter;
