// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound stream producers: job-creation events and dead letters.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tracing::{error, info};

use notibus_config::model::BrokerConfig;
use notibus_core::{JobCreateEvent, JobProducer, NotibusError};

use crate::consumer::map_redis_err;

/// Publishes completed job-creation events onto the outbound stream,
/// keyed by the requester's chat address.
pub struct JobStreamProducer {
    conn: MultiplexedConnection,
    stream: String,
}

impl JobStreamProducer {
    pub async fn connect(config: &BrokerConfig) -> Result<Self, NotibusError> {
        let client = redis::Client::open(config.url.as_str()).map_err(map_redis_err)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_err)?;
        Ok(Self {
            conn,
            stream: config.job_stream.clone(),
        })
    }
}

#[async_trait]
impl JobProducer for JobStreamProducer {
    async fn publish(&self, event: &JobCreateEvent) -> Result<(), NotibusError> {
        let payload = serde_json::to_string(event).map_err(|e| NotibusError::Broker {
            message: format!("failed to serialize job event: {e}"),
            source: Some(Box::new(e)),
        })?;

        let _id: String = self
            .conn
            .clone()
            .xadd(
                &self.stream,
                "*",
                &[
                    ("key", event.requester_whatsapp.as_str()),
                    ("payload", payload.as_str()),
                ],
            )
            .await
            .map_err(map_redis_err)?;

        info!(job_title = %event.job_title, stream = %self.stream, "published job-create event");
        Ok(())
    }
}

/// Republishes unprocessable raw messages, with error context, to the
/// dead-letter stream.
///
/// Forwarding failures are logged and swallowed so the ingestion loop can
/// always acknowledge the original message.
pub struct DeadLetterForwarder {
    conn: MultiplexedConnection,
    stream: String,
    original_stream: String,
}

impl DeadLetterForwarder {
    pub async fn connect(config: &BrokerConfig) -> Result<Self, NotibusError> {
        let client = redis::Client::open(config.url.as_str()).map_err(map_redis_err)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_err)?;
        Ok(Self {
            conn,
            stream: config.dead_letter_stream.clone(),
            original_stream: config.stream.clone(),
        })
    }

    /// Forward the original payload bytes, unmodified, with error context.
    pub async fn forward(&self, payload: &[u8], error_text: &str) {
        let fields: [(&str, &[u8]); 3] = [
            ("payload", payload),
            ("error", error_text.as_bytes()),
            ("original-topic", self.original_stream.as_bytes()),
        ];

        let result: Result<String, _> = self.conn.clone().xadd(&self.stream, "*", &fields).await;

        match result {
            Ok(id) => {
                info!(stream = %self.stream, message_id = %id, "forwarded message to dead-letter stream");
            }
            Err(e) => {
                error!(stream = %self.stream, error = %e, "failed to forward to dead-letter stream");
            }
        }
    }
}
