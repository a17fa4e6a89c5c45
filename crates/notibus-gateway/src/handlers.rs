// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain HTTP handlers.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::server::GatewayState;

/// Service health: uptime and live-socket connection count.
pub async fn get_health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "active_connections": state.registry.count(),
    }))
}
