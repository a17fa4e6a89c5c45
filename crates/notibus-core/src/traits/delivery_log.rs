// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit log of terminal delivery outcomes.

use async_trait::async_trait;

use crate::error::NotibusError;
use crate::types::{DeliveryStatus, NotificationEvent};

/// Records exactly one entry per terminal delivery attempt outcome.
///
/// `destination` is the resolved per-channel target (phone number, email
/// address, or socket identity), not the event's whole destination block.
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    async fn record(
        &self,
        event: &NotificationEvent,
        destination: &str,
        status: DeliveryStatus,
        error_message: Option<&str>,
        retry_count: u32,
    ) -> Result<(), NotibusError>;
}
