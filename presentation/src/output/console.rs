//! Console output formatter for round results

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use summit_domain::DeliberationResult;

/// Formats round results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `result` in the requested format
    pub fn render(result: &DeliberationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Text => Self::format_text(result),
        }
    }

    /// Format the complete result
    pub fn format(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("The Summit"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Message:".cyan().bold(),
            result.message
        ));

        let names: Vec<String> = result.personas().map(|p| p.display_name()).collect();
        output.push_str(&format!(
            "{} {}\n",
            "Panel:".cyan().bold(),
            names.join(", ")
        ));
        if let Some(session) = &result.session_id {
            output.push_str(&format!("{} {}\n", "Session:".dimmed(), session));
        }

        output.push_str(&Self::section_header("Deliberation"));
        for response in &result.responses {
            let mut title = format!("── {} ──", response.persona.display_name())
                .yellow()
                .bold()
                .to_string();
            if response.has_objective {
                title.push_str(&format!(" {}", "[objective]".magenta()));
            }
            output.push_str(&format!("\n{}\n{}\n", title, response.text));
        }

        output.push_str(&format!(
            "\n{}\n",
            format!(
                "{} responses in {:.1}s (correlation {})",
                result.responses.len(),
                result.elapsed_ms as f64 / 1000.0,
                result.correlation_id
            )
            .dimmed()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &DeliberationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Plain transcript: each reply prefixed with its attribution
    pub fn format_text(result: &DeliberationResult) -> String {
        result
            .responses
            .iter()
            .map(|r| format!("{} {}\n", r.persona.attribution(), r.text))
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &DeliberationResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &DeliberationResult) -> String {
        Self::format_json(result)
    }

    fn format_text(&self, result: &DeliberationResult) -> String {
        Self::format_text(result)
    }
}
