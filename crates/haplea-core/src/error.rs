//! Error types for the Haplea engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the Haplea engine and its collaborators.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
///
/// Malformed classifier input is deliberately *not* represented here: an
/// unparseable date, duration, or entity always degrades to a default inside
/// the resolver and never surfaces as an error.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum HapleaError {
    /// The classify call failed or timed out. No fallback command is
    /// synthesized; callers must treat this distinctly from an
    /// `undefined` classification.
    #[error("Classification unavailable: {0}")]
    ClassificationUnavailable(String),

    /// A posted message or expense was rejected by the channel backend.
    /// Not retried; optimistic local state is kept.
    #[error("Channel delivery error: {context}: {message}")]
    ChannelDelivery {
        context: &'static str,
        message: String,
    },

    /// Ledger backend request failed
    #[error("Ledger backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HapleaError {
    /// Creates a ClassificationUnavailable error
    pub fn classification_unavailable(message: impl Into<String>) -> Self {
        Self::ClassificationUnavailable(message.into())
    }

    /// Creates a ChannelDelivery error
    pub fn channel_delivery(context: &'static str, message: impl Into<String>) -> Self {
        Self::ChannelDelivery {
            context,
            message: message.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a ClassificationUnavailable error
    pub fn is_classification_unavailable(&self) -> bool {
        matches!(self, Self::ClassificationUnavailable(_))
    }

    /// Check if this is a ChannelDelivery error
    pub fn is_channel_delivery(&self) -> bool {
        matches!(self, Self::ChannelDelivery { .. })
    }

    /// Check if this is a Config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for HapleaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HapleaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HapleaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for HapleaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, HapleaError>`.
pub type Result<T> = std::result::Result<T, HapleaError>;
