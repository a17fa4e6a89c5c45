// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal Twilio REST client for outbound WhatsApp messages.

use std::time::Duration;

use tracing::debug;

use notibus_config::model::TwilioConfig;
use notibus_core::NotibusError;

/// Base URL for the Twilio API.
const API_BASE_URL: &str = "https://api.twilio.com";

/// HTTP client for the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

impl TwilioClient {
    /// Creates a new client. Requires `account_sid` and `auth_token`.
    pub fn new(config: &TwilioConfig) -> Result<Self, NotibusError> {
        let account_sid = config
            .account_sid
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                NotibusError::Config("twilio.account_sid is required for the WhatsApp sender".into())
            })?;
        let auth_token = config
            .auth_token
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                NotibusError::Config("twilio.auth_token is required for the WhatsApp sender".into())
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotibusError::channel_with("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            account_sid,
            auth_token,
            from_number: config.from_number.clone(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Send one message. `to` must already carry the `whatsapp:` prefix.
    pub async fn send_message(&self, to: &str, body: &str) -> Result<(), NotibusError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let form = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| NotibusError::channel_with("request to chat gateway failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(NotibusError::channel(format!(
                "chat gateway returned {status}: {error_body}"
            )));
        }

        debug!(to, "chat gateway accepted message");
        Ok(())
    }
}
