// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Serves the inbound chat webhook, the live-socket endpoint, and a
//! health route.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use notibus_config::model::GatewayConfig;
use notibus_core::{ConversationHandler, NotibusError};
use notibus_realtime::SocketRegistry;

use crate::handlers;
use crate::webhook;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Inbound chat message processor.
    pub conversation: Arc<dyn ConversationHandler>,
    /// Live-socket connection registry.
    pub registry: Arc<SocketRegistry>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Assemble the gateway routes.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/whatsapp/webhook", post(webhook::handle_webhook))
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway server and serve until the process shuts down.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), NotibusError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| NotibusError::Channel {
                message: format!("failed to bind gateway to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| NotibusError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
