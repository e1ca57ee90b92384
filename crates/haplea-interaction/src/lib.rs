//! Haplea interaction: external collaborators for the core engine.
//!
//! Everything that crosses a process boundary lives here: the NLU
//! classify call, the ledger backend, and the duplex conversation channel,
//! plus the dispatcher that turns free-form query text into resolved
//! commands.
//!
//! # Module Structure
//!
//! - `nlu_client`: `Classifier` trait and the wit-style HTTP client
//! - `ledger_client`: `LedgerBackend` trait and the HTTP client
//! - `channel`: duplex channel event contract and the conversation bridge
//! - `config`: service configuration file loading

pub mod channel;
pub mod config;
pub mod ledger_client;
pub mod nlu_client;

use std::sync::Arc;
use tokio::sync::mpsc;

use haplea_core::command::{self, Command};
use haplea_core::error::Result;

pub use channel::{ConversationChannel, InboundEvent, OutboundEvent};
pub use config::ServiceConfig;
pub use ledger_client::{HttpLedgerClient, LedgerBackend, LedgerEntry, NewExpense};
pub use nlu_client::{Classifier, WitClient};

/// Turns free-form query text into resolved commands.
///
/// Classification is asynchronous and best-effort: a failed classify call
/// surfaces as an error to the caller, distinctly from a successful
/// resolution to [`Command::Undefined`], and no fallback command is
/// synthesized or retried. Each resolved command is also forwarded to the
/// command stream handed out at construction, so routing consumers do not
/// block the input path.
pub struct CommandDispatcher {
    classifier: Arc<dyn Classifier>,
    commands_tx: mpsc::UnboundedSender<Command>,
}

impl CommandDispatcher {
    /// Creates a dispatcher plus the consumer end of its command stream.
    pub fn new(classifier: Arc<dyn Classifier>) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        (
            Self {
                classifier,
                commands_tx,
            },
            commands_rx,
        )
    }

    /// Classifies `input` and resolves the result into a command.
    ///
    /// Exactly one command is produced per successful classification;
    /// resolution itself is total and never fails.
    pub async fn recognize(&self, input: &str) -> Result<Command> {
        let entities = self.classifier.classify(input).await.inspect_err(|err| {
            log::error!("classification failed: {err}");
        })?;

        let command = command::resolve(&entities);
        log::info!("resolved command: {}", command.route().path);

        let _ = self.commands_tx.send(command.clone());
        Ok(command)
    }

    /// Fire-and-forget variant: classification runs in the background and
    /// the caller's input stream is never blocked. Failures are logged;
    /// successful resolutions reach consumers through the command stream.
    pub fn recognize_detached(&self, input: impl Into<String>) {
        let classifier = Arc::clone(&self.classifier);
        let commands_tx = self.commands_tx.clone();
        let input = input.into();
        tokio::spawn(async move {
            match classifier.classify(&input).await {
                Ok(entities) => {
                    let _ = commands_tx.send(command::resolve(&entities));
                }
                Err(err) => log::error!("classification failed: {err}"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use haplea_core::command::{EntityBundle, IntentCandidate};
    use haplea_core::error::HapleaError;

    struct CannedClassifier {
        intent: Option<String>,
    }

    #[async_trait]
    impl Classifier for CannedClassifier {
        async fn classify(&self, _query: &str) -> Result<EntityBundle> {
            Ok(EntityBundle {
                intent: self
                    .intent
                    .iter()
                    .map(|value| IntentCandidate {
                        value: value.clone(),
                        confidence: 0.9,
                    })
                    .collect(),
                ..EntityBundle::default()
            })
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        async fn classify(&self, _query: &str) -> Result<EntityBundle> {
            Err(HapleaError::classification_unavailable("socket closed"))
        }
    }

    #[tokio::test]
    async fn recognized_commands_reach_the_stream() {
        let (dispatcher, mut commands) = CommandDispatcher::new(Arc::new(CannedClassifier {
            intent: Some("see-yesterday".to_string()),
        }));

        let command = dispatcher.recognize("what did I spend yesterday").await.unwrap();
        assert_eq!(command, Command::SeeYesterday);
        assert_eq!(commands.recv().await.unwrap(), Command::SeeYesterday);
    }

    #[tokio::test]
    async fn unknown_intent_is_a_successful_undefined() {
        let (dispatcher, _commands) = CommandDispatcher::new(Arc::new(CannedClassifier {
            intent: Some("order-pizza".to_string()),
        }));

        let command = dispatcher.recognize("order me a pizza").await.unwrap();
        assert_eq!(command, Command::Undefined);
    }

    #[tokio::test]
    async fn classification_failure_is_an_error_not_a_command() {
        let (dispatcher, mut commands) = CommandDispatcher::new(Arc::new(FailingClassifier));

        let err = dispatcher.recognize("anything").await.unwrap_err();
        assert!(err.is_classification_unavailable());

        // No fallback command was synthesized.
        assert!(commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn detached_recognition_does_not_block_the_caller() {
        let (dispatcher, mut commands) = CommandDispatcher::new(Arc::new(CannedClassifier {
            intent: Some("new-entry".to_string()),
        }));

        dispatcher.recognize_detached("add an expense");
        let command = commands.recv().await.unwrap();
        assert!(matches!(command, Command::NewEntry { .. }));
    }
}
