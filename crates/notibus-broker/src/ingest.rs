// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event ingestion loop.
//!
//! Pulls raw messages from the inbound stream, deserializes and
//! normalizes them, hands them to the router, and drives acknowledgment.
//! A message that cannot be processed is forwarded to the dead-letter
//! stream with its error text; its offset is acknowledged either way, so
//! a poison message never blocks the stream.
//!
//! Up to `max_in_flight` messages are processed concurrently, which means
//! acknowledgment order is not arrival order: a later message can be
//! acknowledged before a slower earlier one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use notibus_core::{NotibusError, NotificationEvent, metadata};
use notibus_router::NotificationRouter;

use crate::consumer::{StreamAcker, StreamConsumer, StreamMessage};
use crate::producer::DeadLetterForwarder;

/// Consecutive reconnect failures tolerated before the loop gives up and
/// surfaces the subscription error to the operator.
const MAX_RECONNECT_FAILURES: u32 = 5;

/// Acknowledges one message offset.
#[async_trait]
pub trait MessageAcker: Send + Sync {
    async fn ack(&self, message_id: &str) -> Result<(), NotibusError>;
}

#[async_trait]
impl MessageAcker for StreamAcker {
    async fn ack(&self, message_id: &str) -> Result<(), NotibusError> {
        StreamAcker::ack(self, message_id).await
    }
}

/// Receives unprocessable payloads. Must not fail past its own boundary.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn forward(&self, payload: &[u8], error_text: &str);
}

#[async_trait]
impl DeadLetterSink for DeadLetterForwarder {
    async fn forward(&self, payload: &[u8], error_text: &str) {
        DeadLetterForwarder::forward(self, payload, error_text).await;
    }
}

/// Deserialize, normalize, and route one raw payload.
pub async fn handle_payload(
    router: &NotificationRouter,
    payload: &[u8],
) -> Result<(), NotibusError> {
    let mut event: NotificationEvent = serde_json::from_slice(payload)
        .map_err(|e| NotibusError::Parse(format!("malformed notification event: {e}")))?;
    metadata::normalize_event(&mut event);
    router.route(&event).await
}

/// Process one message end to end and acknowledge its offset.
///
/// The offset is acknowledged after routing succeeds or after the message
/// has been handed to the dead-letter sink, regardless of whether that
/// forwarding itself succeeded.
pub async fn process_message(
    router: &NotificationRouter,
    dead_letter: &dyn DeadLetterSink,
    acker: &dyn MessageAcker,
    message: StreamMessage,
) {
    match handle_payload(router, &message.payload).await {
        Ok(()) => {
            debug!(message_id = %message.id, "successfully processed notification");
            metrics::counter!("notibus_events_total", "outcome" => "processed").increment(1);
        }
        Err(e) => {
            error!(message_id = %message.id, error = %e, "failed to process message, sending to dead-letter");
            metrics::counter!("notibus_events_total", "outcome" => "dead_letter").increment(1);
            dead_letter.forward(&message.payload, &e.to_string()).await;
        }
    }

    if let Err(e) = acker.ack(&message.id).await {
        error!(message_id = %message.id, error = %e, "failed to acknowledge message offset");
    }
}

/// Continuous consumer over the inbound notification stream.
pub struct IngestLoop {
    consumer: StreamConsumer,
    router: Arc<NotificationRouter>,
    dead_letter: Arc<DeadLetterForwarder>,
    in_flight: Arc<Semaphore>,
}

impl IngestLoop {
    pub fn new(
        consumer: StreamConsumer,
        router: Arc<NotificationRouter>,
        dead_letter: Arc<DeadLetterForwarder>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            consumer,
            router,
            dead_letter,
            in_flight: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Run until the subscription fails unrecoverably.
    ///
    /// Transient broker errors trigger a reconnect with a short pause;
    /// only repeated reconnect failures end the loop, and the terminal
    /// error is returned so the operator sees it.
    pub async fn run(mut self) -> Result<(), NotibusError> {
        info!("starting event ingestion loop");
        let mut reconnect_failures = 0u32;

        loop {
            let message = match self.consumer.read_next().await {
                Ok(Some(message)) => {
                    reconnect_failures = 0;
                    message
                }
                Ok(None) => continue, // block timeout, nothing to do
                Err(e) => {
                    warn!(error = %e, "broker read failed, reconnecting");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    if let Err(reconnect_err) = self.consumer.reconnect().await {
                        reconnect_failures += 1;
                        error!(
                            error = %reconnect_err,
                            consecutive = reconnect_failures,
                            "broker reconnect failed"
                        );
                        if reconnect_failures >= MAX_RECONNECT_FAILURES {
                            return Err(reconnect_err);
                        }
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    continue;
                }
            };

            let permit = match self.in_flight.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // The semaphore is never closed; treat as shutdown.
                    return Ok(());
                }
            };

            let router = self.router.clone();
            let dead_letter = self.dead_letter.clone();
            let acker = self.consumer.acker();
            tokio::spawn(async move {
                process_message(&router, dead_letter.as_ref(), &acker, message).await;
                drop(permit);
            });
        }
    }
}
