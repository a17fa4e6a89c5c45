// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonicalization of event metadata keys.
//!
//! Producers are inconsistent about key casing; channel senders only read
//! the canonical camelCase keys. Normalization copies a recognized alias
//! into the canonical key when the canonical key is absent or null. An
//! existing non-null canonical value always wins, which makes the pass
//! idempotent.

use serde_json::Value;

use crate::types::{Metadata, NotificationEvent};

/// Canonical metadata keys and their accepted aliases.
const CANONICAL_KEYS: [(&str, &[&str]); 5] = [
    ("providerName", &["provider_name"]),
    ("providerPhone", &["provider_phone"]),
    ("providerEmail", &["provider_email"]),
    ("wage", &["Wage"]),
    ("jobId", &["job_id"]),
];

/// Normalize a metadata map in place.
pub fn normalize(metadata: &mut Metadata) {
    for (canonical, aliases) in CANONICAL_KEYS {
        if metadata.get(canonical).is_some_and(|v| !v.is_null()) {
            continue;
        }
        for alias in aliases {
            if let Some(value) = metadata.get(*alias)
                && !value.is_null()
            {
                metadata.insert(canonical.to_string(), value.clone());
                break;
            }
        }
    }
}

/// Normalize an event's metadata, if it has any.
pub fn normalize_event(event: &mut NotificationEvent) {
    if let Some(metadata) = event.metadata.as_mut() {
        normalize(metadata);
    }
}

/// Read a metadata value as a trimmed non-empty string.
pub fn get_str<'a>(metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Read a metadata value as an owned string, empty when absent.
pub fn text(metadata: &Metadata, key: &str) -> String {
    get_str(metadata, key).unwrap_or_default().to_string()
}
