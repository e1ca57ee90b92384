//! Duplex conversation channel contract.
//!
//! Only the event contract is consumed here; the transport itself (socket,
//! reconnection, topics) is an external collaborator. Inbound events feed
//! the conversation log or the error sink; outbound events are queued on an
//! unbounded channel so producing never blocks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};

use haplea_core::conversation::{ConversationLog, ConversationMessage};
use haplea_core::error::HapleaError;

use crate::ledger_client::NewExpense;

/// Events arriving from the channel backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A message was persisted and broadcast.
    MessagePosted { message: ConversationMessage },
    /// A posted message was rejected.
    MessagePostError { reason: String },
    /// The question thread failed out-of-band.
    ThreadError { reason: String },
}

/// Events produced for the channel backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OutboundEvent {
    PostMessage { body: String },
    CreateExpense { payload: NewExpense },
}

/// Owns the conversation log and bridges it to the duplex channel.
///
/// Delivery errors are surfaced to the error sink and are not retried;
/// whatever local state exists stays untouched.
pub struct ConversationChannel {
    log: Arc<RwLock<ConversationLog>>,
    outbound_tx: mpsc::UnboundedSender<OutboundEvent>,
    error_tx: mpsc::UnboundedSender<HapleaError>,
}

impl ConversationChannel {
    /// Creates the channel plus the consumer ends of its outbound and
    /// error queues.
    pub fn new() -> (
        Self,
        mpsc::UnboundedReceiver<OutboundEvent>,
        mpsc::UnboundedReceiver<HapleaError>,
    ) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let channel = Self {
            log: Arc::new(RwLock::new(ConversationLog::new())),
            outbound_tx,
            error_tx,
        };
        (channel, outbound_rx, error_rx)
    }

    /// Applies one inbound event: appends posted messages, routes errors to
    /// the sink.
    pub async fn handle_inbound(&self, event: InboundEvent) {
        match event {
            InboundEvent::MessagePosted { message } => {
                log::debug!("message posted: id={}", message.id);
                self.log.write().await.append(message);
            }
            InboundEvent::MessagePostError { reason } => {
                log::error!("message post rejected: {reason}");
                let _ = self
                    .error_tx
                    .send(HapleaError::channel_delivery("message:post", reason));
            }
            InboundEvent::ThreadError { reason } => {
                log::error!("question thread error: {reason}");
                let _ = self
                    .error_tx
                    .send(HapleaError::channel_delivery("question:thread", reason));
            }
        }
    }

    /// Queues a free-form query for posting, after trimming. Queries of one
    /// character or less are dropped; returns whether the post was queued.
    pub fn post_query(&self, input: &str) -> bool {
        let query = input.trim();
        if query.len() <= 1 {
            return false;
        }
        self.post_message(query);
        true
    }

    /// Queues a message body for posting, as-is.
    pub fn post_message(&self, body: impl Into<String>) {
        let _ = self.outbound_tx.send(OutboundEvent::PostMessage {
            body: body.into(),
        });
    }

    /// Queues an expense-create for the backend.
    pub fn create_expense(&self, payload: NewExpense) {
        let _ = self
            .outbound_tx
            .send(OutboundEvent::CreateExpense { payload });
    }

    /// Newest-first snapshot of the conversation.
    pub async fn snapshot(&self) -> Vec<ConversationMessage> {
        self.log.read().await.snapshot()
    }

    /// Shared handle to the underlying log.
    pub fn log(&self) -> Arc<RwLock<ConversationLog>> {
        Arc::clone(&self.log)
    }
}
