// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementations of the pipeline's capability traits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use notibus_core::{
    ChannelSender, DeliveryLog, DeliveryStatus, JobCreateEvent, JobProducer, NotibusError,
    NotificationEvent, SessionStore, TextExtractor,
};

/// Channel sender that captures every event it is asked to deliver.
///
/// Flip `fail` to make subsequent sends return a transient channel error.
pub struct CapturingSender {
    name: &'static str,
    pub sent: Mutex<Vec<NotificationEvent>>,
    fail: AtomicBool,
}

impl CapturingSender {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Messages delivered so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }
}

#[async_trait]
impl ChannelSender for CapturingSender {
    fn channel(&self) -> &'static str {
        self.name
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), NotibusError> {
        self.sent.lock().unwrap().push(event.clone());
        if self.fail.load(Ordering::SeqCst) {
            Err(NotibusError::channel(format!("{} unavailable", self.name)))
        } else {
            Ok(())
        }
    }
}

/// One captured delivery log entry.
#[derive(Debug, Clone)]
pub struct RecordedDelivery {
    pub destination: String,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    pub retry_count: u32,
}

/// Delivery log that records entries in memory.
#[derive(Default)]
pub struct MemoryDeliveryLog {
    pub entries: Mutex<Vec<RecordedDelivery>>,
}

impl MemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<RecordedDelivery> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryLog for MemoryDeliveryLog {
    async fn record(
        &self,
        _event: &NotificationEvent,
        destination: &str,
        status: DeliveryStatus,
        error_message: Option<&str>,
        retry_count: u32,
    ) -> Result<(), NotibusError> {
        self.entries.lock().unwrap().push(RecordedDelivery {
            destination: destination.to_string(),
            status,
            error_message: error_message.map(str::to_string),
            retry_count,
        });
        Ok(())
    }
}

/// Session store over a plain map. TTLs are recorded but never enforced.
#[derive(Default)]
pub struct MemorySessionStore {
    pub values: Mutex<HashMap<String, String>>,
    pub refreshes: Mutex<Vec<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, NotibusError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), NotibusError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn refresh(&self, key: &str, _ttl: Duration) -> Result<(), NotibusError> {
        self.refreshes.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), NotibusError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Job producer that records published events.
#[derive(Default)]
pub struct RecordingJobProducer {
    pub published: Mutex<Vec<JobCreateEvent>>,
}

impl RecordingJobProducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<JobCreateEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobProducer for RecordingJobProducer {
    async fn publish(&self, event: &JobCreateEvent) -> Result<(), NotibusError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Extractor returning a fixed result, or an error when none is set.
pub struct StaticExtractor {
    result: Option<JobCreateEvent>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticExtractor {
    /// Always succeeds with `event` (requester backfilled per call).
    pub fn succeeding(event: JobCreateEvent) -> Self {
        Self {
            result: Some(event),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with an extractor error.
    pub fn failing() -> Self {
        Self {
            result: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextExtractor for StaticExtractor {
    async fn extract_job(
        &self,
        text: &str,
        requester: &str,
    ) -> Result<JobCreateEvent, NotibusError> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.result {
            Some(event) => {
                let mut event = event.clone();
                event.requester_whatsapp = requester.to_string();
                Ok(event)
            }
            None => Err(NotibusError::Extractor {
                message: "extraction unavailable".into(),
                source: None,
            }),
        }
    }
}
