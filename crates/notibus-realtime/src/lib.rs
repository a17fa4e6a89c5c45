// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-socket channel for the Notibus pipeline.
//!
//! Tracks open WebSocket connections per user identity and pushes
//! notification payloads to them. "Not connected" is a permanent,
//! non-retried delivery failure.

pub mod registry;
pub mod sender;

pub use registry::SocketRegistry;
pub use sender::RealtimeSender;
