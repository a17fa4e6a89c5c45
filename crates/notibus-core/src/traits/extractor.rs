// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text extraction: free-form job descriptions into structured events.

use async_trait::async_trait;

use crate::error::NotibusError;
use crate::types::JobCreateEvent;

/// Converts unstructured user text into a [`JobCreateEvent`] via an
/// external completion service.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract job details from `text`, attributing the result to the
    /// requesting chat identity.
    async fn extract_job(&self, text: &str, requester: &str)
    -> Result<JobCreateEvent, NotibusError>;
}
