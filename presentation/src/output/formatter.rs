//! Output formatter trait

use summit_domain::DeliberationResult;

/// Trait for formatting a completed round
pub trait OutputFormatter {
    /// Format the complete result with header and sections
    fn format(&self, result: &DeliberationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &DeliberationResult) -> String;

    /// Format as a plain transcript
    fn format_text(&self, result: &DeliberationResult) -> String;
}
