// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound producer for job-creation events.

use async_trait::async_trait;

use crate::error::NotibusError;
use crate::types::JobCreateEvent;

/// Publishes completed job-creation events onto the outbound log for
/// downstream consumers.
#[async_trait]
pub trait JobProducer: Send + Sync {
    async fn publish(&self, event: &JobCreateEvent) -> Result<(), NotibusError>;
}
