// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of open live-socket connections, keyed by user identity.
//!
//! Each identity maps to exactly one outbound message channel.
//! Registering a new connection for an identity replaces any prior one
//! (last-writer-wins); entries are removed when the connection closes for
//! any reason.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Concurrently-accessed map of user identity to outbound socket channel.
#[derive(Default)]
pub struct SocketRegistry {
    connections: DashMap<String, mpsc::Sender<String>>,
}

impl SocketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for `user_id`, replacing any prior one.
    pub fn register(&self, user_id: &str, sender: mpsc::Sender<String>) {
        let replaced = self.connections.insert(user_id.to_string(), sender);
        if replaced.is_some() {
            debug!(user_id, "replaced existing live-socket connection");
        } else {
            info!(user_id, "live-socket connection registered");
        }
    }

    /// Remove the connection for `user_id`, if any.
    pub fn remove(&self, user_id: &str) {
        if self.connections.remove(user_id).is_some() {
            info!(user_id, "live-socket connection removed");
        }
    }

    /// Look up the open connection for `user_id`.
    pub fn lookup(&self, user_id: &str) -> Option<mpsc::Sender<String>> {
        self.connections.get(user_id).map(|entry| entry.clone())
    }

    /// Number of currently registered identities.
    pub fn count(&self) -> usize {
        self.connections.len()
    }
}
