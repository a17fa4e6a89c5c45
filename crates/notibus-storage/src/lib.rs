// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed delivery audit log for Notibus.
//!
//! One row is written per terminal delivery attempt outcome; rows are
//! never mutated after insert. All writes go through a single
//! tokio-rusqlite background connection.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod records;

pub use adapter::SqliteDeliveryLog;
pub use database::Database;
pub use records::DeliveryRecord;
