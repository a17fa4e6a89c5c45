// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email channel for the Notibus pipeline.
//!
//! Renders job-match events as rich HTML when provider metadata is
//! present, plain text otherwise, and delivers over SMTP with retry and
//! delivery audit logging.

pub mod body;
pub mod sender;

pub use body::{EmailBody, build_body};
pub use sender::{EmailSender, LettreMailer, SmtpMailer};
