//! Persona value object

use serde::{Deserialize, Serialize};

/// A persona taking part in a round (Value Object)
///
/// The identifier is opaque to the orchestrator: which personas exist, how
/// many take part and in which order is decided by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Persona(String);

impl Persona {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the persona identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name, e.g. `ships_cat` becomes `Ships Cat`.
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Natural-language attribution used when quoting this persona in a
    /// transcript: `(Name said)`.
    pub fn attribution(&self) -> String {
        format!("({} said)", self.display_name())
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Persona {
    fn from(s: &str) -> Self {
        Persona::new(s)
    }
}

impl From<String> for Persona {
    fn from(s: String) -> Self {
        Persona::new(s)
    }
}
