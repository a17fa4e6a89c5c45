// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-socket endpoint.
//!
//! Clients connect with their identity in the query string
//! (`GET /ws?userId=...`). The connection is registered for push
//! delivery; inbound frames are ignored. The registry entry is removed
//! when the connection closes for any reason.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::server::GatewayState;

/// Connection query parameters.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<GatewayState>,
) -> Response {
    let Some(user_id) = params.user_id.filter(|v| !v.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing userId query parameter").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Handle an individual live-socket connection.
///
/// Spawns a sender task pumping queued payloads to the client, then
/// drains inbound frames until the connection closes.
async fn handle_socket(socket: WebSocket, state: GatewayState, user_id: String) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<String>(64);
    state.registry.register(&user_id, tx);

    let sender_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = ws_receiver.next().await {
        match frame {
            Message::Close(_) => break,
            _ => {
                // Push-only endpoint: client frames carry no meaning.
                debug!(user_id = %user_id, "ignoring inbound live-socket frame");
            }
        }
    }

    state.registry.remove(&user_id);
    sender_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_params_deserialize_user_id() {
        let params: WsParams = serde_json::from_str(r#"{"userId": "user-1"}"#).unwrap();
        assert_eq!(params.user_id.as_deref(), Some("user-1"));

        let params: WsParams = serde_json::from_str("{}").unwrap();
        assert!(params.user_id.is_none());
    }
}
