//! Classified-entity types returned by the external NLU service.
//!
//! The classifier is best-effort and untrusted: every field is defaulted so
//! that an absent array, a missing field, or an unknown key can never fail
//! deserialization. A bundle that carries nothing usable still deserializes
//! to the empty bundle and resolves to the fallback command.

use serde::{Deserialize, Serialize};

/// Structured output of the external natural-language classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityBundle {
    /// Intent candidates; index 0 is assumed to be the highest-confidence
    /// classification.
    #[serde(default)]
    pub intent: Vec<IntentCandidate>,
    /// Datetime entities (ISO-8601 values, day grain).
    #[serde(default)]
    pub datetime: Vec<DatetimeEntity>,
    /// Duration entities ("two weeks ago" style).
    #[serde(default)]
    pub duration: Vec<DurationEntity>,
}

impl EntityBundle {
    /// The authoritative intent candidate, if any.
    pub fn top_intent(&self) -> Option<&IntentCandidate> {
        self.intent.first()
    }
}

/// A single intent classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentCandidate {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub confidence: f64,
}

/// A datetime entity; `value` is an ISO-8601 string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatetimeEntity {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub grain: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

/// A duration entity, e.g. `{ unit: "week", value: 2 }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationEntity {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub confidence: f64,
}
