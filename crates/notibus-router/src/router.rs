// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source-based dispatch of notification events to channel senders.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use notibus_core::{ChannelSender, NotibusError, NotificationEvent, NotificationSource};

/// Maps an event's declared source to one or more channel senders.
///
/// Channel-level retries and audit logging live inside the senders; the
/// router only selects targets and aggregates fan-out outcomes.
pub struct NotificationRouter {
    chat: Arc<dyn ChannelSender>,
    email: Arc<dyn ChannelSender>,
    realtime: Arc<dyn ChannelSender>,
}

impl NotificationRouter {
    pub fn new(
        chat: Arc<dyn ChannelSender>,
        email: Arc<dyn ChannelSender>,
        realtime: Arc<dyn ChannelSender>,
    ) -> Self {
        Self {
            chat,
            email,
            realtime,
        }
    }

    /// Route one event to the sender(s) selected by its source.
    ///
    /// `ALL` fans out concurrently to every channel whose destination
    /// field is present and non-blank; a partial failure makes the
    /// aggregate outcome a failure. Per-channel results are in the
    /// delivery log, not the aggregate error.
    pub async fn route(&self, event: &NotificationEvent) -> Result<(), NotibusError> {
        event.validate()?;

        info!(
            username = %event.username,
            source = %event.source,
            "routing notification"
        );

        match event.source {
            NotificationSource::Chat => self.chat.send(event).await,
            NotificationSource::Email => self.email.send(event).await,
            NotificationSource::Realtime => self.realtime.send(event).await,
            NotificationSource::All => self.fan_out(event).await,
        }
    }

    async fn fan_out(&self, event: &NotificationEvent) -> Result<(), NotibusError> {
        let Some(destination) = event.destination.as_ref() else {
            return Err(NotibusError::Validation("destination is required".into()));
        };

        let mut targets: Vec<&Arc<dyn ChannelSender>> = Vec::new();
        for (sender, field) in [
            (&self.chat, &destination.whatsapp_number),
            (&self.email, &destination.email),
            (&self.realtime, &destination.user_id),
        ] {
            if field.as_deref().is_some_and(|v| !v.trim().is_empty()) {
                targets.push(sender);
            } else {
                debug!(channel = sender.channel(), "skipping channel: no destination");
            }
        }

        if targets.is_empty() {
            return Err(NotibusError::Validation(
                "fan-out requires at least one destination".into(),
            ));
        }

        let results = join_all(targets.iter().map(|sender| sender.send(event))).await;

        let mut failures = Vec::new();
        for (sender, result) in targets.iter().zip(results) {
            if let Err(error) = result {
                warn!(channel = sender.channel(), error = %error, "fan-out channel failed");
                failures.push(format!("{}: {error}", sender.channel()));
            }
        }

        metrics::counter!(
            "notibus_fanout_total",
            "outcome" => if failures.is_empty() { "success" } else { "failure" }
        )
        .increment(1);

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotibusError::channel(format!(
                "{} of {} channels failed: {}",
                failures.len(),
                targets.len(),
                failures.join("; ")
            )))
        }
    }
}
