//! Conversation message types.

use serde::{Deserialize, Serialize};

use crate::command::EntityBundle;

/// A single message in the conversation feed.
///
/// `id` is server-assigned, unique, and monotonically non-decreasing by
/// arrival (not necessarily by wall clock). Once appended to the log a
/// message is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: i64,
    pub body: String,
    #[serde(default)]
    pub data: MessageData,
}

/// Classifier-derived payload attached to a message by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub entities: Option<EntityBundle>,
    /// Reply-widget name, e.g. `"new-entry"` or `"undefined-intent"`.
    #[serde(default)]
    pub name: Option<String>,
}
