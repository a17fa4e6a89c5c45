// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value session state behind the conversation flow.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NotibusError;

/// External session store with per-key expiry.
///
/// The store owns persistence and TTL enforcement; callers only read and
/// write string values by key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the value for `key`, if the key exists and has not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, NotibusError>;

    /// Write `value` under `key` with a fresh TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), NotibusError>;

    /// Reset the TTL of `key` without changing its value. A missing key is
    /// not an error.
    async fn refresh(&self, key: &str, ttl: Duration) -> Result<(), NotibusError>;

    /// Remove `key`. A missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), NotibusError>;
}
