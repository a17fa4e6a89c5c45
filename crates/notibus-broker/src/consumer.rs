// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer-group reads from the inbound notification stream.
//!
//! Auto-commit is never used; every message is acknowledged explicitly
//! after processing via [`StreamAcker`].

use redis::aio::MultiplexedConnection;
use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, Client, RedisResult};
use tracing::{debug, info, warn};

use notibus_config::model::BrokerConfig;
use notibus_core::NotibusError;

/// A raw message read from the inbound stream.
#[derive(Debug, Clone)]
pub struct StreamMessage {
    /// Broker-assigned message id (e.g. "1234567890-0").
    pub id: String,
    /// Raw event payload bytes.
    pub payload: Vec<u8>,
}

/// Field under which producers write the event body.
const PAYLOAD_FIELD: &str = "payload";

/// Blocking consumer-group reader over the inbound stream.
pub struct StreamConsumer {
    client: Client,
    conn: MultiplexedConnection,
    stream: String,
    group: String,
    consumer_name: String,
    block_timeout_ms: u64,
}

impl StreamConsumer {
    /// Connect to the broker and ensure the consumer group exists.
    pub async fn connect(config: &BrokerConfig) -> Result<Self, NotibusError> {
        let client = Client::open(config.url.as_str()).map_err(map_redis_err)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_err)?;

        let consumer = Self {
            client,
            conn,
            stream: config.stream.clone(),
            group: config.group.clone(),
            consumer_name: format!("notibus-{}", uuid::Uuid::new_v4()),
            block_timeout_ms: config.block_timeout_ms,
        };
        consumer.ensure_group().await?;
        Ok(consumer)
    }

    /// Create the consumer group, tolerating one that already exists.
    async fn ensure_group(&self) -> Result<(), NotibusError> {
        // XGROUP CREATE <stream> <group> $ MKSTREAM: deliver only new
        // messages to a fresh group.
        let result: RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.stream)
            .arg(&self.group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut self.conn.clone())
            .await;

        match result {
            Ok(()) => {
                info!(stream = %self.stream, group = %self.group, "created consumer group");
                Ok(())
            }
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!(stream = %self.stream, group = %self.group, "consumer group already exists");
                Ok(())
            }
            Err(e) => Err(map_redis_err(e)),
        }
    }

    /// Read the next undelivered message, blocking up to the configured
    /// timeout. Returns `None` when the timeout expires with no messages.
    pub async fn read_next(&mut self) -> Result<Option<StreamMessage>, NotibusError> {
        let options = StreamReadOptions::default()
            .group(&self.group, &self.consumer_name)
            .count(1)
            .block(self.block_timeout_ms as usize);

        let reply: Option<StreamReadReply> = self
            .conn
            .xread_options(&[self.stream.as_str()], &[">"], &options)
            .await
            .map_err(map_redis_err)?;

        let Some(reply) = reply else {
            return Ok(None);
        };

        let Some(entry) = reply.keys.first().and_then(|key| key.ids.first()) else {
            return Ok(None);
        };

        let payload = match entry.map.get(PAYLOAD_FIELD) {
            Some(value) => redis::from_redis_value::<Vec<u8>>(value).map_err(map_redis_err)?,
            None => {
                return Err(NotibusError::Broker {
                    message: format!("stream entry {} is missing the payload field", entry.id),
                    source: None,
                });
            }
        };

        debug!(message_id = %entry.id, payload_len = payload.len(), "read message from stream");
        Ok(Some(StreamMessage {
            id: entry.id.clone(),
            payload,
        }))
    }

    /// A cheap, clonable handle for acknowledging messages from spawned
    /// processing tasks.
    pub fn acker(&self) -> StreamAcker {
        StreamAcker {
            conn: self.conn.clone(),
            stream: self.stream.clone(),
            group: self.group.clone(),
        }
    }

    /// Re-establish the broker connection after an error.
    pub async fn reconnect(&mut self) -> Result<(), NotibusError> {
        info!("reconnecting to broker");
        self.conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_err)?;
        self.ensure_group().await
    }
}

/// Acknowledges processed messages, removing them from the pending list.
#[derive(Clone)]
pub struct StreamAcker {
    conn: MultiplexedConnection,
    stream: String,
    group: String,
}

impl StreamAcker {
    pub async fn ack(&self, message_id: &str) -> Result<(), NotibusError> {
        let acked: i64 = self
            .conn
            .clone()
            .xack(&self.stream, &self.group, &[message_id])
            .await
            .map_err(map_redis_err)?;

        if acked == 1 {
            debug!(message_id, stream = %self.stream, "acknowledged message");
        } else {
            warn!(
                message_id,
                stream = %self.stream,
                acked,
                "XACK did not acknowledge exactly one message"
            );
        }
        Ok(())
    }
}

pub(crate) fn map_redis_err(err: redis::RedisError) -> NotibusError {
    NotibusError::Broker {
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}
