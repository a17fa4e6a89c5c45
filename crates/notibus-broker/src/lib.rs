// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event log client and ingestion loop for Notibus.
//!
//! Consumes the inbound notification stream with a consumer group and
//! manual acknowledgment, publishes job-creation events to the outbound
//! stream, and forwards unprocessable messages to the dead-letter stream.

pub mod consumer;
pub mod ingest;
pub mod producer;

pub use consumer::{StreamAcker, StreamConsumer, StreamMessage};
pub use ingest::IngestLoop;
pub use producer::{DeadLetterForwarder, JobStreamProducer};
