// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text extraction for the Notibus conversation flow.
//!
//! Turns free-form job descriptions into structured [`JobCreateEvent`]s
//! via the Groq chat-completions API.
//!
//! [`JobCreateEvent`]: notibus_core::JobCreateEvent

pub mod client;

pub use client::GroqExtractor;
