use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing knobs for the engine's two cancellable timers.
///
/// Call sites historically use quiet windows between 300 and 1000 ms for the
/// draft debounce; the validation pulse auto-clears after one second.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Quiet period, in milliseconds, with no further draft submissions
    /// before a recompute runs.
    #[serde(default = "default_draft_debounce_ms")]
    pub draft_debounce_ms: u64,
    /// Lifetime, in milliseconds, of a validation pulse before it
    /// auto-clears.
    #[serde(default = "default_validation_ttl_ms")]
    pub validation_ttl_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            draft_debounce_ms: default_draft_debounce_ms(),
            validation_ttl_ms: default_validation_ttl_ms(),
        }
    }
}

impl EngineConfig {
    pub fn draft_debounce(&self) -> Duration {
        Duration::from_millis(self.draft_debounce_ms)
    }

    pub fn validation_ttl(&self) -> Duration {
        Duration::from_millis(self.validation_ttl_ms)
    }
}

fn default_draft_debounce_ms() -> u64 {
    300
}

fn default_validation_ttl_ms() -> u64 {
    1000
}
