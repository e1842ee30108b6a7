//! Progress notification port
//!
//! Defines the interface for reporting progress during a synchronous round.

use summit_domain::Persona;

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer. Callbacks are
/// informational and never affect control flow.
pub trait DeliberationProgress: Send + Sync {
    /// Called once before the first persona is invoked
    fn on_round_start(&self, total_personas: usize);

    /// Called before a persona is invoked
    fn on_persona_start(&self, persona: &Persona, index: usize);

    /// Called when a persona's invocation finishes
    fn on_persona_complete(&self, persona: &Persona, success: bool);

    /// Called when the round ends, successfully or not
    fn on_round_complete(&self, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DeliberationProgress for NoProgress {
    fn on_round_start(&self, _total_personas: usize) {}
    fn on_persona_start(&self, _persona: &Persona, _index: usize) {}
    fn on_persona_complete(&self, _persona: &Persona, _success: bool) {}
    fn on_round_complete(&self, _success: bool) {}
}
