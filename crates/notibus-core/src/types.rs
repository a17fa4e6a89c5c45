// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Notibus pipeline.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::NotibusError;

/// Free-form event metadata, preserved as a JSON object.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Declared origin of a notification event, driving channel selection.
///
/// Wire values are upper-case and parsed case-insensitively. `WHATSAPP`
/// is accepted as a legacy alias for `CHAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum NotificationSource {
    #[strum(to_string = "CHAT", serialize = "WHATSAPP")]
    Chat,
    #[strum(to_string = "EMAIL")]
    Email,
    #[strum(to_string = "REALTIME")]
    Realtime,
    #[strum(to_string = "ALL")]
    All,
}

impl Serialize for NotificationSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NotificationSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value)
            .map_err(|_| serde::de::Error::custom(format!("invalid notification source: {value}")))
    }
}

/// Per-channel delivery targets. At least one must be present for the
/// event's declared source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Destination {
    /// True when at least one target field is present and non-blank.
    pub fn has_any(&self) -> bool {
        [&self.whatsapp_number, &self.email, &self.user_id]
            .into_iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// One delivery request consumed from the inbound event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub subject: String,
    pub source: NotificationSource,
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NotificationEvent {
    /// Checks the mandatory-field invariant before the event reaches routing.
    pub fn validate(&self) -> Result<(), NotibusError> {
        if self.subject.trim().is_empty() {
            return Err(NotibusError::Validation("subject is required".into()));
        }
        if self.message.trim().is_empty() {
            return Err(NotibusError::Validation("message is required".into()));
        }
        let destination = self
            .destination
            .as_ref()
            .ok_or_else(|| NotibusError::Validation("destination is required".into()))?;
        if !destination.has_any() {
            return Err(NotibusError::Validation(
                "destination must name at least one target".into(),
            ));
        }
        Ok(())
    }
}

/// Structured output of text extraction, published to the job-creation log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCreateEvent {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub wage: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub requester_whatsapp: String,
}

/// Terminal outcome of one delivery attempt, as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DeliveryStatus {
    #[strum(to_string = "SUCCESS")]
    Success,
    #[strum(to_string = "FAILED")]
    Failed,
}
