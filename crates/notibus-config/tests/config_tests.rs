// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Notibus configuration system.

use notibus_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_notibus_config() {
    let toml = r#"
[service]
name = "notibus-test"
log_level = "debug"

[broker]
url = "redis://broker:6379"
stream = "events"
group = "workers"
dead_letter_stream = "events-dlq"
job_stream = "jobs"
block_timeout_ms = 1000
max_in_flight = 4

[retry]
max_retries = 5
backoff_ms = 250

[twilio]
account_sid = "AC123"
auth_token = "token"
from_number = "whatsapp:+10000000000"

[email]
smtp_host = "smtp.example.com"
smtp_port = 2525
username = "notify@example.com"
password = "secret"

[extractor]
api_key = "gsk_123"
model = "llama-3.3-70b-versatile"

[session]
url = "redis://sessions:6379"
ttl_hours = 24
key_prefix = "wa:"

[gateway]
host = "0.0.0.0"
port = 9090

[storage]
database_path = "/tmp/notibus-test.db"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "notibus-test");
    assert_eq!(config.broker.url, "redis://broker:6379");
    assert_eq!(config.broker.stream, "events");
    assert_eq!(config.broker.dead_letter_stream, "events-dlq");
    assert_eq!(config.broker.max_in_flight, 4);
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.backoff_ms, 250);
    assert_eq!(config.twilio.account_sid.as_deref(), Some("AC123"));
    assert_eq!(config.email.smtp_port, 2525);
    assert_eq!(config.extractor.api_key.as_deref(), Some("gsk_123"));
    assert_eq!(config.session.key_prefix, "wa:");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.storage.database_path, "/tmp/notibus-test.db");
}

/// Unknown fields are rejected by deny_unknown_fields.
#[test]
fn unknown_field_is_rejected() {
    let toml = r#"
[broker]
straem = "notifications"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("straem"),
        "error should mention the bad key, got: {err_str}"
    );
}

/// Empty config falls back to compiled defaults and validates.
#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.broker.stream, "notifications");
    assert_eq!(config.session.ttl_hours, 24);
    assert_eq!(config.retry.max_retries, 3);
}

/// Value-level validation collects every problem.
#[test]
fn validation_collects_all_problems() {
    let toml = r#"
[service]
log_level = "loud"

[broker]
max_in_flight = 0
dead_letter_stream = "notifications"

[session]
ttl_hours = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"service.log_level"));
    assert!(fields.contains(&"broker.max_in_flight"));
    assert!(fields.contains(&"broker.dead_letter_stream"));
    assert!(fields.contains(&"session.ttl_hours"));
}

/// A partial section keeps defaults for the unspecified fields.
#[test]
fn partial_section_keeps_other_defaults() {
    let toml = r#"
[broker]
stream = "custom-events"
"#;

    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.broker.stream, "custom-events");
    assert_eq!(config.broker.group, "notibus");
    assert_eq!(config.broker.block_timeout_ms, 5000);
}
