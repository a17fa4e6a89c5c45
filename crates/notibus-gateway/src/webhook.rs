// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound chat webhook.
//!
//! The gateway posts form-encoded `From`/`Body` fields for each inbound
//! message. The response is always an empty acknowledgment payload: the
//! caller is fire-and-forget, and backend errors never surface to the
//! external chat party beyond the flow's own prompts.

use axum::Form;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{error, info};

use crate::server::GatewayState;

/// Empty acknowledgment body expected by the chat gateway.
const EMPTY_RESPONSE: &str = "<Response></Response>";

/// Form fields posted by the chat gateway.
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
}

/// Handle one inbound chat message.
pub async fn handle_webhook(
    State(state): State<GatewayState>,
    Form(form): Form<WebhookForm>,
) -> Response {
    if let (Some(from), Some(body)) = (form.from, form.body) {
        info!(from = %from, "received chat webhook message");
        if let Err(e) = state.conversation.handle_message(&from, &body).await {
            // Absorbed: the webhook acknowledges regardless of outcome.
            error!(from = %from, error = %e, "conversation processing failed");
        }
    }

    (
        [(header::CONTENT_TYPE, "text/xml")],
        EMPTY_RESPONSE,
    )
        .into_response()
}
