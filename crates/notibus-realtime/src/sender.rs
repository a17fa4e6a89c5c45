// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-socket channel sender.
//!
//! Unlike the other channels this one never retries: an identity with no
//! open connection will not gain one within a backoff window, so the
//! failure is logged and surfaced immediately.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};

use notibus_core::{
    ChannelSender, DeliveryLog, DeliveryStatus, NotibusError, NotificationEvent,
};

use crate::registry::SocketRegistry;

/// Reason recorded when the destination identity has no open connection.
const NOT_CONNECTED: &str = "User not connected";

/// Pushes notification events to open live-socket connections.
pub struct RealtimeSender {
    registry: Arc<SocketRegistry>,
    delivery_log: Arc<dyn DeliveryLog>,
}

impl RealtimeSender {
    pub fn new(registry: Arc<SocketRegistry>, delivery_log: Arc<dyn DeliveryLog>) -> Self {
        Self {
            registry,
            delivery_log,
        }
    }
}

/// Build the JSON payload pushed over the socket, with provider contact
/// fields extracted for client convenience.
pub fn build_payload(event: &NotificationEvent) -> Value {
    let meta_value = |key: &str| {
        event
            .metadata
            .as_ref()
            .and_then(|m| m.get(key).cloned())
            .unwrap_or_else(|| Value::String(String::new()))
    };

    json!({
        "subject": event.subject,
        "message": event.message,
        "username": event.username,
        "userName": event.user_name,
        "destination": event.destination,
        "metadata": event.metadata,
        "providerName": meta_value("providerName"),
        "providerPhone": meta_value("providerPhone"),
        "providerEmail": meta_value("providerEmail"),
        "timestamp": Utc::now().timestamp_millis(),
    })
}

#[async_trait]
impl ChannelSender for RealtimeSender {
    fn channel(&self) -> &'static str {
        "realtime"
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), NotibusError> {
        let user_id = event
            .destination
            .as_ref()
            .and_then(|d| d.user_id.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                NotibusError::Validation("user id is required for real-time notification".into())
            })?;

        let Some(connection) = self.registry.lookup(user_id) else {
            warn!(user_id, "no active live-socket connection");
            self.delivery_log
                .record(event, user_id, DeliveryStatus::Failed, Some(NOT_CONNECTED), 0)
                .await?;
            metrics::counter!("notibus_deliveries_total", "channel" => "realtime", "status" => "failure")
                .increment(1);
            return Err(NotibusError::NotConnected {
                user_id: user_id.to_string(),
            });
        };

        let payload = build_payload(event).to_string();
        if connection.send(payload).await.is_err() {
            // The receiving task dropped; the connection is effectively closed.
            warn!(user_id, "live-socket connection closed during send");
            self.registry.remove(user_id);
            self.delivery_log
                .record(event, user_id, DeliveryStatus::Failed, Some(NOT_CONNECTED), 0)
                .await?;
            metrics::counter!("notibus_deliveries_total", "channel" => "realtime", "status" => "failure")
                .increment(1);
            return Err(NotibusError::NotConnected {
                user_id: user_id.to_string(),
            });
        }

        self.delivery_log
            .record(event, user_id, DeliveryStatus::Success, None, 0)
            .await?;
        metrics::counter!("notibus_deliveries_total", "channel" => "realtime", "status" => "success")
            .increment(1);
        info!(user_id, "real-time notification sent");
        Ok(())
    }
}
