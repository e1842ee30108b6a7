//! Progress reporting for a synchronous round

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use summit_application::DeliberationProgress;
use summit_domain::Persona;

/// Reports progress with a progress bar over the panel
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliberationProgress for ProgressReporter {
    fn on_round_start(&self, total_personas: usize) {
        let bar = ProgressBar::new(total_personas as u64);
        bar.set_style(Self::style());
        bar.set_prefix("Deliberating");
        bar.set_message("Starting...");
        bar.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_persona_start(&self, persona: &Persona, _index: usize) {
        self.with_bar(|bar| bar.set_message(format!("{} is speaking...", persona.display_name())));
    }

    fn on_persona_complete(&self, persona: &Persona, success: bool) {
        self.with_bar(|bar| {
            let status = if success {
                format!("{} {}", "v".green(), persona.display_name())
            } else {
                format!("{} {}", "x".red(), persona.display_name())
            };
            bar.set_message(status);
            if success {
                bar.inc(1);
            }
        });
    }

    fn on_round_complete(&self, success: bool) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = guard.take() {
            if success {
                bar.finish_with_message(format!("{}", "Round complete!".green()));
            } else {
                bar.abandon_with_message(format!("{}", "Round stopped".red()));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DeliberationProgress for SimpleProgress {
    fn on_round_start(&self, total_personas: usize) {
        println!(
            "{} {} ({} personas)",
            "->".cyan(),
            "Deliberation".bold(),
            total_personas
        );
    }

    fn on_persona_start(&self, persona: &Persona, index: usize) {
        println!("  {} {}. {}", "..".dimmed(), index + 1, persona.display_name());
    }

    fn on_persona_complete(&self, persona: &Persona, success: bool) {
        if success {
            println!("  {} {}", "v".green(), persona.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), persona.display_name());
        }
    }

    fn on_round_complete(&self, _success: bool) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_completed_personas() {
        let reporter = ProgressReporter::new();
        let gandalf = Persona::new("gandalf");

        reporter.on_round_start(2);
        reporter.on_persona_start(&gandalf, 0);
        reporter.on_persona_complete(&gandalf, true);

        let position = reporter.bar.lock().unwrap().as_ref().map(|b| b.position());
        assert_eq!(position, Some(1));

        reporter.on_round_complete(true);
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_callbacks_without_round_are_ignored() {
        let reporter = ProgressReporter::default();
        reporter.on_persona_complete(&Persona::new("gandalf"), false);
        reporter.on_round_complete(false);
    }
}
