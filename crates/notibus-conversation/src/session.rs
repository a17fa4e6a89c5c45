// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis-backed implementation of the [`SessionStore`] trait.
//!
//! The store owns TTL enforcement; expired keys simply read back as
//! absent, which the flow treats as a fresh IDLE session.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use notibus_core::{NotibusError, SessionStore};

/// Conversation session store over a Redis key-value connection.
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    pub async fn connect(url: &str) -> Result<Self, NotibusError> {
        let client = redis::Client::open(url).map_err(map_err)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_err)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, NotibusError> {
        self.conn
            .clone()
            .get::<_, Option<String>>(key)
            .await
            .map_err(map_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), NotibusError> {
        self.conn
            .clone()
            .set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(map_err)
    }

    async fn refresh(&self, key: &str, ttl: Duration) -> Result<(), NotibusError> {
        // EXPIRE on a missing key is a no-op, which is what we want for
        // implicit sessions that have not been written yet.
        let _: i64 = self
            .conn
            .clone()
            .expire(key, ttl.as_secs() as i64)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), NotibusError> {
        let _: i64 = self.conn.clone().del(key).await.map_err(map_err)?;
        Ok(())
    }
}

fn map_err(err: redis::RedisError) -> NotibusError {
    NotibusError::Storage {
        source: Box::new(err),
    }
}
