//! Append-only conversation log, newest message first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::message::ConversationMessage;

/// Ordered message store with prepend semantics for display.
///
/// Messages are never mutated or removed; iteration order is
/// most-recent-first, and arrival order is preserved. The log is a plain
/// owned value so callers keep the ordering guarantees auditable; shared
/// access goes through whatever lock the owner chooses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: VecDeque<ConversationMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at the logical head.
    pub fn append(&mut self, message: ConversationMessage) {
        self.messages.push_front(message);
    }

    /// The full ordered sequence, newest first.
    pub fn snapshot(&self) -> Vec<ConversationMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Newest-first iteration without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter()
    }

    pub fn latest(&self) -> Option<&ConversationMessage> {
        self.messages.front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
