// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Notibus notification pipeline.
//!
//! Provides the domain types, error type, metadata canonicalization,
//! retry policy, and the capability traits implemented by the channel,
//! storage, broker, and conversation crates.

pub mod error;
pub mod metadata;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::NotibusError;
pub use retry::{RetryError, RetryPolicy};
pub use traits::{
    ChannelSender, ConversationHandler, DeliveryLog, JobProducer, SessionStore, TextExtractor,
};
pub use types::{
    DeliveryStatus, Destination, JobCreateEvent, Metadata, NotificationEvent, NotificationSource,
};
