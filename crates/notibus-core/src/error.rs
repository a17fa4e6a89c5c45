// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Notibus delivery pipeline.

use thiserror::Error;

/// The primary error type used across all Notibus crates.
#[derive(Debug, Error)]
pub enum NotibusError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required field is missing or blank, or an event names an unsupported target.
    /// Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed payloads (event JSON, extraction responses). Never retried.
    #[error("parse error: {0}")]
    Parse(String),

    /// Delivery channel errors (gateway rejection, SMTP failure, socket write).
    /// Treated as transient and retried up to the configured ceiling.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The destination identity has no open live-socket connection.
    /// The condition will not change within a backoff window, so it is never retried.
    #[error("recipient not connected: {user_id}")]
    NotConnected { user_id: String },

    /// Delivery log persistence errors.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Event log (stream) client errors.
    #[error("broker error: {message}")]
    Broker {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text-extraction service errors.
    #[error("extractor error: {message}")]
    Extractor {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NotibusError {
    /// Whether a failed operation may succeed if attempted again.
    ///
    /// Validation, parse, and not-connected failures are permanent by
    /// definition; the retry helper consults this before backing off.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Channel { .. } | Self::Broker { .. } | Self::Extractor { .. } => true,
            Self::Config(_)
            | Self::Validation(_)
            | Self::Parse(_)
            | Self::NotConnected { .. }
            | Self::Storage { .. }
            | Self::Internal(_) => false,
        }
    }

    /// Convenience constructor for transient channel failures.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Convenience constructor for channel failures wrapping an underlying error.
    pub fn channel_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Channel {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
