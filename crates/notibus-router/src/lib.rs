// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification routing for the Notibus pipeline.
//!
//! The router owns source-to-channel selection, including concurrent
//! fan-out for `ALL`-sourced events.

pub mod router;

pub use router::NotificationRouter;
