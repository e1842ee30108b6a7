//! Storage key for a topic's cancellation flag

use sha2::{Digest, Sha256};

/// Prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "summit_cancel_";

/// Key under which a topic's cancellation flag is stored.
///
/// Topics are hashed so that keys have a fixed length and contain no
/// characters a cache backend might reject. This is not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancellationKey(String);

impl CancellationKey {
    pub fn for_topic(prefix: &str, topic: &str) -> Self {
        let digest = Sha256::digest(topic.as_bytes());
        Self(format!("{}{}", prefix, hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CancellationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
