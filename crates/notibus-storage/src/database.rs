// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The `Database` struct IS the single writer; do NOT create
//! additional Connection instances for writes.

use notibus_core::NotibusError;
use tokio_rusqlite::Connection;

use crate::migrations;

/// Handle to the delivery log database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, NotibusError> {
        let conn = Connection::open(path).await.map_err(map_tr_err)?;
        Self::initialize(conn).await
    }

    /// Open an in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, NotibusError> {
        let conn = Connection::open_in_memory().await.map_err(map_tr_err)?;
        Self::initialize(conn).await
    }

    async fn initialize(conn: Connection) -> Result<Self, NotibusError> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| {
            migrations::run_migrations(conn)?;
            Ok::<_, refinery::Error>(())
        })
        .await
        .map_err(map_tr_err)?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Map a tokio-rusqlite error into the crate error type.
pub fn map_tr_err<E: std::error::Error + Send + Sync + 'static>(err: E) -> NotibusError {
    NotibusError::Storage {
        source: Box::new(err),
    }
}
