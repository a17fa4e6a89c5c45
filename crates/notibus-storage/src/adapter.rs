// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`DeliveryLog`] trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use notibus_core::{DeliveryLog, DeliveryStatus, NotibusError, NotificationEvent};

use crate::database::Database;
use crate::records::{self, DeliveryRecord};

/// Delivery log backed by the single-writer SQLite database.
pub struct SqliteDeliveryLog {
    db: Database,
}

impl SqliteDeliveryLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle, for observability queries.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DeliveryLog for SqliteDeliveryLog {
    async fn record(
        &self,
        event: &NotificationEvent,
        destination: &str,
        status: DeliveryStatus,
        error_message: Option<&str>,
        retry_count: u32,
    ) -> Result<(), NotibusError> {
        let metadata = event
            .metadata
            .as_ref()
            .map(|m| serde_json::to_string(m))
            .transpose()
            .map_err(|e| NotibusError::Storage {
                source: Box::new(e),
            })?;

        let now = Utc::now().to_rfc3339();
        let record = DeliveryRecord {
            id: 0,
            user_name: event.user_name.clone(),
            username: event.username.clone(),
            subject: event.subject.clone(),
            source: event.source.to_string(),
            destination: destination.to_string(),
            message: event.message.clone(),
            metadata,
            status: status.to_string(),
            retry_count,
            error_message: error_message.map(str::to_string),
            created_at: now.clone(),
            updated_at: now,
        };

        let id = records::insert_record(&self.db, &record).await?;
        debug!(id, status = %status, destination, "recorded delivery outcome");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notibus_core::{Destination, NotificationSource};
    use serde_json::json;

    fn event() -> NotificationEvent {
        NotificationEvent {
            user_name: "Asha".into(),
            username: "asha01".into(),
            subject: "New job match".into(),
            source: NotificationSource::Chat,
            destination: Some(Destination {
                whatsapp_number: Some("+911234567890".into()),
                email: None,
                user_id: None,
            }),
            message: "A painter role is available".into(),
            metadata: Some(
                json!({"wage": "500rs/hour", "jobId": "job-1"})
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
        }
    }

    #[tokio::test]
    async fn records_success_outcome() {
        let db = Database::open_in_memory().await.unwrap();
        let log = SqliteDeliveryLog::new(db);

        log.record(&event(), "+911234567890", DeliveryStatus::Success, None, 0)
            .await
            .unwrap();

        let rows = records::list_recent(log.database(), 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "SUCCESS");
        assert_eq!(rows[0].destination, "+911234567890");
        assert_eq!(rows[0].source, "CHAT");
        assert_eq!(rows[0].retry_count, 0);
        assert!(rows[0].error_message.is_none());
        assert!(rows[0].metadata.as_deref().unwrap().contains("500rs/hour"));
    }

    #[tokio::test]
    async fn records_failed_outcome_with_retry_count() {
        let db = Database::open_in_memory().await.unwrap();
        let log = SqliteDeliveryLog::new(db);

        log.record(
            &event(),
            "+911234567890",
            DeliveryStatus::Failed,
            Some("gateway timeout"),
            3,
        )
        .await
        .unwrap();

        let rows = records::list_recent(log.database(), 10).await.unwrap();
        assert_eq!(rows[0].status, "FAILED");
        assert_eq!(rows[0].retry_count, 3);
        assert_eq!(rows[0].error_message.as_deref(), Some("gateway timeout"));
    }

    #[tokio::test]
    async fn one_row_per_terminal_outcome() {
        let db = Database::open_in_memory().await.unwrap();
        let log = SqliteDeliveryLog::new(db);

        for _ in 0..3 {
            log.record(&event(), "+911234567890", DeliveryStatus::Success, None, 0)
                .await
                .unwrap();
        }
        log.record(&event(), "+911234567890", DeliveryStatus::Failed, Some("x"), 1)
            .await
            .unwrap();

        assert_eq!(
            records::count_by_status(log.database(), "SUCCESS")
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            records::count_by_status(log.database(), "FAILED")
                .await
                .unwrap(),
            1
        );
    }
}
