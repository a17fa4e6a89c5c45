// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel sender trait for delivery integrations (WhatsApp, email, live socket).

use async_trait::async_trait;

use crate::error::NotibusError;
use crate::types::NotificationEvent;

/// One delivery medium.
///
/// A sender validates its own destination field, performs the delivery
/// attempt (with whatever retry policy applies to its channel), records
/// the terminal outcome in the delivery log, and propagates failure to
/// the caller.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Stable channel name used in logs and metrics labels.
    fn channel(&self) -> &'static str;

    /// Deliver one event through this channel.
    async fn send(&self, event: &NotificationEvent) -> Result<(), NotibusError>;
}
