// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Notibus service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Notibus configuration.
///
/// Loaded from TOML files with environment variable overrides. All
/// sections are optional and default to sensible values; secrets default
/// to `None` and are validated at startup by the components that need them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotibusConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Inbound/outbound event log settings.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Delivery retry policy.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Twilio WhatsApp gateway settings.
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// SMTP email settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Text-extraction API settings.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Conversation session store settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Webhook/WebSocket gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Delivery log persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "notibus".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Event log (Redis Streams) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Broker connection URL.
    #[serde(default = "default_broker_url")]
    pub url: String,

    /// Inbound notification stream.
    #[serde(default = "default_stream")]
    pub stream: String,

    /// Consumer group name.
    #[serde(default = "default_group")]
    pub group: String,

    /// Dead-letter stream for unprocessable messages.
    #[serde(default = "default_dead_letter_stream")]
    pub dead_letter_stream: String,

    /// Outbound job-creation stream.
    #[serde(default = "default_job_stream")]
    pub job_stream: String,

    /// Blocking read timeout in milliseconds.
    #[serde(default = "default_block_timeout_ms")]
    pub block_timeout_ms: u64,

    /// Maximum number of messages processed concurrently.
    ///
    /// Set to 1 to restore strict per-partition ordering at the cost of
    /// throughput.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: default_broker_url(),
            stream: default_stream(),
            group: default_group(),
            dead_letter_stream: default_dead_letter_stream(),
            job_stream: default_job_stream(),
            block_timeout_ms: default_block_timeout_ms(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_broker_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_stream() -> String {
    "notifications".to_string()
}

fn default_group() -> String {
    "notibus".to_string()
}

fn default_dead_letter_stream() -> String {
    "notifications-dlq".to_string()
}

fn default_job_stream() -> String {
    "job-create".to_string()
}

fn default_block_timeout_ms() -> u64 {
    5000
}

fn default_max_in_flight() -> usize {
    8
}

/// Delivery retry policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Maximum retries after the initial delivery attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles per retry.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    500
}

/// Twilio WhatsApp gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Twilio account SID.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Twilio auth token.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sender number, with or without the `whatsapp:` prefix.
    #[serde(default = "default_from_number")]
    pub from_number: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: default_from_number(),
        }
    }
}

fn default_from_number() -> String {
    "whatsapp:+14155238886".to_string()
}

/// SMTP email configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username; also the From address unless overridden.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,

    /// Override for the From address.
    #[serde(default)]
    pub from_address: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from_address: None,
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

/// Text-extraction API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// API key for the completion service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[serde(default = "default_extractor_url")]
    pub api_url: String,

    /// Model identifier.
    #[serde(default = "default_extractor_model")]
    pub model: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_extractor_url(),
            model: default_extractor_model(),
        }
    }
}

fn default_extractor_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_extractor_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

/// Conversation session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Session store connection URL.
    #[serde(default = "default_session_url")]
    pub url: String,

    /// Session time-to-live in hours, refreshed on every inbound message.
    #[serde(default = "default_session_ttl_hours")]
    pub ttl_hours: u64,

    /// Key prefix for session entries.
    #[serde(default = "default_session_key_prefix")]
    pub key_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: default_session_url(),
            ttl_hours: default_session_ttl_hours(),
            key_prefix: default_session_key_prefix(),
        }
    }
}

fn default_session_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_session_ttl_hours() -> u64 {
    24
}

fn default_session_key_prefix() -> String {
    "whatsapp:state:".to_string()
}

/// Webhook/WebSocket gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

/// Delivery log persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "notibus.db".to_string()
}
