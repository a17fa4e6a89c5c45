// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp channel sender: retry, audit logging, address normalization.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use notibus_core::{
    ChannelSender, DeliveryLog, DeliveryStatus, NotibusError, NotificationEvent, RetryPolicy, retry,
};

use crate::client::TwilioClient;

/// Required address prefix for the chat gateway.
const ADDRESS_PREFIX: &str = "whatsapp:";

/// Prefix a destination address if it does not already carry the prefix.
pub fn normalize_address(to: &str) -> String {
    if to.starts_with(ADDRESS_PREFIX) {
        to.to_string()
    } else {
        format!("{ADDRESS_PREFIX}{to}")
    }
}

/// Sends notification events as WhatsApp messages.
pub struct WhatsAppSender {
    client: TwilioClient,
    delivery_log: Arc<dyn DeliveryLog>,
    retry_policy: RetryPolicy,
}

impl WhatsAppSender {
    pub fn new(
        client: TwilioClient,
        delivery_log: Arc<dyn DeliveryLog>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            delivery_log,
            retry_policy,
        }
    }
}

#[async_trait]
impl ChannelSender for WhatsAppSender {
    fn channel(&self) -> &'static str {
        "whatsapp"
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), NotibusError> {
        let to = event
            .destination
            .as_ref()
            .and_then(|d| d.whatsapp_number.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| NotibusError::Validation("WhatsApp number is required".into()))?;

        let formatted = normalize_address(to);
        let outcome = retry::run(&self.retry_policy, "whatsapp send", || {
            self.client.send_message(&formatted, &event.message)
        })
        .await;

        match outcome {
            Ok(()) => {
                self.delivery_log
                    .record(event, &formatted, DeliveryStatus::Success, None, 0)
                    .await?;
                metrics::counter!("notibus_deliveries_total", "channel" => "whatsapp", "status" => "success")
                    .increment(1);
                info!(to = %formatted, "WhatsApp notification sent");
                Ok(())
            }
            Err(retry::RetryError { error, retries }) => {
                error!(to = %formatted, error = %error, retries, "WhatsApp notification failed");
                self.delivery_log
                    .record(
                        event,
                        &formatted,
                        DeliveryStatus::Failed,
                        Some(&error.to_string()),
                        retries,
                    )
                    .await?;
                metrics::counter!("notibus_deliveries_total", "channel" => "whatsapp", "status" => "failure")
                    .increment(1);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notibus_config::model::TwilioConfig;
    use notibus_core::{Destination, NotificationSource};
    use notibus_test_utils::MemoryDeliveryLog;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> TwilioClient {
        TwilioClient::new(&TwilioConfig {
            account_sid: Some("AC123".into()),
            auth_token: Some("token".into()),
            from_number: "whatsapp:+10000000000".into(),
        })
        .unwrap()
        .with_base_url(base_url)
    }

    fn event(number: Option<&str>) -> NotificationEvent {
        NotificationEvent {
            user_name: "Asha".into(),
            username: "asha01".into(),
            subject: "Reply".into(),
            source: NotificationSource::Chat,
            destination: Some(Destination {
                whatsapp_number: number.map(str::to_string),
                email: None,
                user_id: None,
            }),
            message: "A painter role is available".into(),
            metadata: None,
        }
    }

    fn sender(base_url: String, log: Arc<MemoryDeliveryLog>) -> WhatsAppSender {
        WhatsAppSender::new(client(base_url), log, RetryPolicy::new(2, 1))
    }

    #[test]
    fn address_normalization_adds_prefix_once() {
        assert_eq!(normalize_address("+911234567890"), "whatsapp:+911234567890");
        assert_eq!(
            normalize_address("whatsapp:+911234567890"),
            "whatsapp:+911234567890"
        );
    }

    #[test]
    fn client_requires_credentials() {
        let config = TwilioConfig {
            account_sid: None,
            auth_token: Some("token".into()),
            from_number: "whatsapp:+10000000000".into(),
        };
        assert!(TwilioClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn missing_number_is_a_validation_error_with_no_log_entry() {
        let log = Arc::new(MemoryDeliveryLog::new());
        let sender = sender("http://127.0.0.1:1".into(), log.clone());

        let result = sender.send(&event(None)).await;
        assert!(matches!(result, Err(NotibusError::Validation(_))));
        assert!(log.entries().is_empty());
    }

    #[tokio::test]
    async fn successful_send_logs_success_with_zero_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(body_string_contains("whatsapp%3A%2B911234567890"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let log = Arc::new(MemoryDeliveryLog::new());
        let sender = sender(server.uri(), log.clone());
        sender.send(&event(Some("+911234567890"))).await.unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, DeliveryStatus::Success);
        assert_eq!(entries[0].retry_count, 0);
        assert_eq!(entries[0].destination, "whatsapp:+911234567890");
    }

    #[tokio::test]
    async fn gateway_errors_are_retried_then_logged_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream error"))
            .expect(3) // initial attempt + 2 retries
            .mount(&server)
            .await;

        let log = Arc::new(MemoryDeliveryLog::new());
        let sender = sender(server.uri(), log.clone());
        let result = sender.send(&event(Some("+911234567890"))).await;

        assert!(matches!(result, Err(NotibusError::Channel { .. })));
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, DeliveryStatus::Failed);
        assert_eq!(entries[0].retry_count, 2);
        assert!(entries[0].error_message.as_deref().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn transient_failure_then_success_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let log = Arc::new(MemoryDeliveryLog::new());
        let sender = sender(server.uri(), log.clone());
        sender.send(&event(Some("+911234567890"))).await.unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, DeliveryStatus::Success);
    }
}
