//! Renders a topic's events as a live transcript

use crate::cli::commands::OutputFormat;
use colored::Colorize;
use std::io::Write;
use summit_domain::{StreamEvent, StreamPayload, StreamingAck};
use tokio::sync::broadcast::{self, error::RecvError};

/// Turns stream events into terminal output.
///
/// In `json` format every event is one JSON line; otherwise tokens are
/// written inline under a header per persona.
pub struct StreamPrinter {
    format: OutputFormat,
}

impl StreamPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render_ack(&self, ack: &StreamingAck) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string(ack).unwrap_or_else(|_| "{}".to_string()) + "\n"
            }
            _ => {
                let session = ack.session_id.as_deref().unwrap_or("none");
                format!(
                    "{} topic {} (session {})\n",
                    "Streaming on".dimmed(),
                    ack.topic.cyan(),
                    session
                )
            }
        }
    }

    pub fn render(&self, event: &StreamEvent) -> String {
        if self.format == OutputFormat::Json {
            return serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string()) + "\n";
        }

        let name = event
            .persona
            .as_ref()
            .map(|p| p.display_name())
            .unwrap_or_default();

        match &event.payload {
            StreamPayload::PersonaStarted => match self.format {
                OutputFormat::Text => match &event.persona {
                    Some(persona) => format!("{} ", persona.attribution()),
                    None => String::new(),
                },
                _ => format!("\n{}\n", format!("── {name} ──").yellow().bold()),
            },
            StreamPayload::Token { content } => content.clone(),
            StreamPayload::PersonaCompleted { has_objective, .. } => {
                if *has_objective && self.format == OutputFormat::Full {
                    format!(" {}\n", "[objective]".magenta())
                } else {
                    "\n".to_string()
                }
            }
            StreamPayload::PersonaFailed { message } => {
                format!("\n{}\n", format!("x {name} failed: {message}").red())
            }
            StreamPayload::RoundCompleted { responses } => match self.format {
                OutputFormat::Text => String::new(),
                _ => format!("\n{}\n", format!("{responses} responses").dimmed()),
            },
            StreamPayload::RoundCancelled { completed } => format!(
                "\n{}\n",
                format!("[cancelled after {completed} responses]").yellow()
            ),
            StreamPayload::RoundAborted { message } => {
                format!("\n{}\n", format!("x round aborted: {message}").red())
            }
        }
    }

    /// Print events from `rx` until a terminal event arrives.
    ///
    /// Returns the terminal event, or `None` if the topic closed first.
    pub async fn follow<W: Write>(
        &self,
        mut rx: broadcast::Receiver<StreamEvent>,
        out: &mut W,
    ) -> std::io::Result<Option<StreamEvent>> {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    out.write_all(self.render(&event).as_bytes())?;
                    out.flush()?;
                    if event.is_terminal() {
                        return Ok(Some(event));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    let note = format!("[{skipped} events dropped]");
                    writeln!(out, "\n{}", note.dimmed())?;
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }
    }
}
