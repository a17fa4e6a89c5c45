// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery log row type and queries.

use notibus_core::NotibusError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// One persisted delivery attempt outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub id: i64,
    pub user_name: String,
    pub username: String,
    pub subject: String,
    pub source: String,
    pub destination: String,
    pub message: String,
    pub metadata: Option<String>,
    pub status: String,
    pub retry_count: u32,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert a delivery record. The `id` field of the argument is ignored.
pub async fn insert_record(db: &Database, record: &DeliveryRecord) -> Result<i64, NotibusError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO delivery_log
                   (user_name, username, subject, source, destination, message,
                    metadata, status, retry_count, error_message, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    record.user_name,
                    record.username,
                    record.subject,
                    record.source,
                    record.destination,
                    record.message,
                    record.metadata,
                    record.status,
                    record.retry_count,
                    record.error_message,
                    record.created_at,
                    record.updated_at,
                ],
            )?;
            Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// List the most recent delivery records, newest first.
pub async fn list_recent(db: &Database, limit: u32) -> Result<Vec<DeliveryRecord>, NotibusError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_name, username, subject, source, destination, message,
                        metadata, status, retry_count, error_message, created_at, updated_at
                 FROM delivery_log ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(DeliveryRecord {
                    id: row.get(0)?,
                    user_name: row.get(1)?,
                    username: row.get(2)?,
                    subject: row.get(3)?,
                    source: row.get(4)?,
                    destination: row.get(5)?,
                    message: row.get(6)?,
                    metadata: row.get(7)?,
                    status: row.get(8)?,
                    retry_count: row.get(9)?,
                    error_message: row.get(10)?,
                    created_at: row.get(11)?,
                    updated_at: row.get(12)?,
                })
            })?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok::<_, rusqlite::Error>(records)
        })
        .await
        .map_err(map_tr_err)
}

/// Count records with the given status.
pub async fn count_by_status(db: &Database, status: &str) -> Result<u64, NotibusError> {
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM delivery_log WHERE status = ?1",
                params![status],
                |row| row.get(0),
            )?;
            Ok::<_, rusqlite::Error>(count)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> DeliveryRecord {
        DeliveryRecord {
            id: 0,
            user_name: "Asha".into(),
            username: "asha01".into(),
            subject: "New job match".into(),
            source: "CHAT".into(),
            destination: "whatsapp:+911234567890".into(),
            message: "A painter role is available".into(),
            metadata: None,
            status: status.into(),
            retry_count: 0,
            error_message: None,
            created_at: "2026-08-06T10:00:00Z".into(),
            updated_at: "2026-08-06T10:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn file_backed_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delivery.db");
        let path_str = path.to_str().unwrap();

        {
            let db = Database::open(path_str).await.unwrap();
            insert_record(&db, &record("SUCCESS")).await.unwrap();
        }

        // Reopen: migrations are already applied, data is still there.
        let db = Database::open(path_str).await.unwrap();
        let rows = list_recent(&db, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "SUCCESS");
    }

    #[tokio::test]
    async fn list_recent_returns_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        insert_record(&db, &record("SUCCESS")).await.unwrap();
        insert_record(&db, &record("FAILED")).await.unwrap();

        let rows = list_recent(&db, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, "FAILED");
        assert_eq!(rows[1].status, "SUCCESS");
        assert!(rows[0].id > rows[1].id);
    }
}
