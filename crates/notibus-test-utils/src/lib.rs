// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared mock collaborators for Notibus tests.
//!
//! Fast, deterministic, in-memory stand-ins for the external services the
//! pipeline consumes, so component tests run without a broker, SMTP
//! relay, chat gateway, or session store.

pub mod mocks;

pub use mocks::{
    CapturingSender, MemoryDeliveryLog, MemorySessionStore, RecordedDelivery, RecordingJobProducer,
    StaticExtractor,
};
