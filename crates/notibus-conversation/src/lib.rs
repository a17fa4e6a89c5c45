// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational job-posting flow for Notibus.
//!
//! A per-identity finite-state machine over inbound WhatsApp messages:
//! guided menu, confirmation, free-form details, text extraction, and
//! publication of the resulting job event to the outbound stream.

pub mod flow;
pub mod prompts;
pub mod session;

pub use flow::{ConversationFlow, ConversationState};
pub use session::RedisSessionStore;
