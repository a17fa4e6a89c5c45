// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for Notibus.
//!
//! Exposes the inbound chat webhook, the live-socket push endpoint, and
//! a health route. The webhook is fire-and-forget from the caller's
//! perspective: it always acknowledges, regardless of outcome.

pub mod handlers;
pub mod server;
pub mod webhook;
pub mod ws;

pub use server::{GatewayState, build_router, start_server};
