// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./notibus.toml` > `~/.config/notibus/notibus.toml`
//! > `/etc/notibus/notibus.toml` with environment variable overrides via the
//! `NOTIBUS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::NotibusConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/notibus/notibus.toml` (system-wide)
/// 3. `~/.config/notibus/notibus.toml` (user XDG config)
/// 4. `./notibus.toml` (local directory)
/// 5. `NOTIBUS_*` environment variables
pub fn load_config() -> Result<NotibusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NotibusConfig::default()))
        .merge(Toml::file("/etc/notibus/notibus.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("notibus/notibus.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("notibus.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<NotibusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NotibusConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NotibusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NotibusConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `NOTIBUS_BROKER_DEAD_LETTER_STREAM`
/// must map to `broker.dead_letter_stream`, not `broker.dead.letter.stream`.
fn env_provider() -> Env {
    Env::prefixed("NOTIBUS_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: NOTIBUS_TWILIO_AUTH_TOKEN -> "twilio_auth_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("broker_", "broker.", 1)
            .replacen("retry_", "retry.", 1)
            .replacen("twilio_", "twilio.", 1)
            .replacen("email_", "email.", 1)
            .replacen("extractor_", "extractor.", 1)
            .replacen("session_", "session.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
