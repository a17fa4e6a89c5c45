// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound chat message handling.

use async_trait::async_trait;

use crate::error::NotibusError;

/// Processes one inbound chat message from the webhook.
///
/// The webhook acknowledges the caller regardless of the result; errors
/// surface only in logs and in the flow's own reply prompts.
#[async_trait]
pub trait ConversationHandler: Send + Sync {
    async fn handle_message(&self, from: &str, body: &str) -> Result<(), NotibusError>;
}
