// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the loaded configuration.
//!
//! Figment guarantees types and known keys; this pass checks value-level
//! constraints that serde cannot express.

use thiserror::Error;

use crate::model::NotibusConfig;

/// A single configuration problem, keyed by the offending field path.
#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate value-level constraints on a loaded config.
///
/// Collects all problems rather than stopping at the first.
pub fn validate_config(config: &NotibusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::new(
            "service.log_level",
            format!(
                "must be one of {LOG_LEVELS:?}, got \"{}\"",
                config.service.log_level
            ),
        ));
    }

    if config.broker.max_in_flight == 0 {
        errors.push(ConfigError::new(
            "broker.max_in_flight",
            "must be at least 1",
        ));
    }
    if config.broker.stream.trim().is_empty() {
        errors.push(ConfigError::new("broker.stream", "must not be empty"));
    }
    if config.broker.stream == config.broker.dead_letter_stream {
        errors.push(ConfigError::new(
            "broker.dead_letter_stream",
            "must differ from broker.stream",
        ));
    }

    if config.retry.backoff_ms == 0 {
        errors.push(ConfigError::new("retry.backoff_ms", "must be at least 1"));
    }

    if config.session.ttl_hours == 0 {
        errors.push(ConfigError::new("session.ttl_hours", "must be at least 1"));
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::new("gateway.port", "must be non-zero"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Render validation errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    eprintln!("notibus: invalid configuration:");
    for error in errors {
        eprintln!("  - {error}");
    }
}
