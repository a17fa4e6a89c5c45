// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp channel for the Notibus pipeline.
//!
//! Delivers notification events through the Twilio Messages API with
//! exponential-backoff retry and delivery audit logging.

pub mod client;
pub mod sender;

pub use client::TwilioClient;
pub use sender::WhatsAppSender;
