// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email channel sender over SMTP.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use notibus_config::model::EmailConfig;
use notibus_core::{
    ChannelSender, DeliveryLog, DeliveryStatus, NotibusError, NotificationEvent, RetryPolicy, retry,
};

use crate::body::{EmailBody, build_body};

/// Transport seam so the sender is testable without an SMTP relay.
#[async_trait]
pub trait SmtpMailer: Send + Sync {
    async fn deliver(&self, message: &Message) -> Result<(), NotibusError>;
}

/// Production mailer over lettre's async SMTP transport.
pub struct LettreMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl LettreMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, NotibusError> {
        let username = config.username.clone().ok_or_else(|| {
            NotibusError::Config("email.username is required for the email sender".into())
        })?;
        let password = config.password.clone().ok_or_else(|| {
            NotibusError::Config("email.password is required for the email sender".into())
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| NotibusError::channel_with("failed to build SMTP transport", e))?
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl SmtpMailer for LettreMailer {
    async fn deliver(&self, message: &Message) -> Result<(), NotibusError> {
        self.transport
            .send(message.clone())
            .await
            .map(|_| ())
            .map_err(|e| NotibusError::channel_with("SMTP delivery failed", e))
    }
}

/// Sends notification events as email, rich HTML when provider metadata
/// is present.
pub struct EmailSender {
    mailer: Box<dyn SmtpMailer>,
    from_address: String,
    delivery_log: Arc<dyn DeliveryLog>,
    retry_policy: RetryPolicy,
}

impl EmailSender {
    /// Build a sender over a real SMTP transport.
    pub fn new(
        config: &EmailConfig,
        delivery_log: Arc<dyn DeliveryLog>,
        retry_policy: RetryPolicy,
    ) -> Result<Self, NotibusError> {
        let from_address = config
            .from_address
            .clone()
            .or_else(|| config.username.clone())
            .ok_or_else(|| {
                NotibusError::Config(
                    "email.from_address or email.username is required for the email sender".into(),
                )
            })?;
        let mailer = Box::new(LettreMailer::new(config)?);
        Ok(Self {
            mailer,
            from_address,
            delivery_log,
            retry_policy,
        })
    }

    /// Build a sender over an arbitrary mailer. Used by tests.
    pub fn with_mailer(
        mailer: Box<dyn SmtpMailer>,
        from_address: String,
        delivery_log: Arc<dyn DeliveryLog>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            mailer,
            from_address,
            delivery_log,
            retry_policy,
        }
    }

    fn build_message(&self, event: &NotificationEvent, to: &str) -> Result<Message, NotibusError> {
        let builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotibusError::Config("invalid email.from_address".into()))?,
            )
            .to(to
                .parse()
                .map_err(|_| NotibusError::Validation(format!("invalid email address: {to}")))?)
            .subject(&event.subject);

        let message = match build_body(event) {
            EmailBody::Html(html) => builder
                .header(ContentType::TEXT_HTML)
                .body(html),
            EmailBody::Plain(text) => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text),
        };
        message.map_err(|e| NotibusError::channel_with("failed to build email message", e))
    }
}

#[async_trait]
impl ChannelSender for EmailSender {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn send(&self, event: &NotificationEvent) -> Result<(), NotibusError> {
        let to = event
            .destination
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| NotibusError::Validation("email address is required".into()))?
            .to_string();

        let message = self.build_message(event, &to)?;

        let outcome = retry::run(&self.retry_policy, "email send", || {
            self.mailer.deliver(&message)
        })
        .await;

        match outcome {
            Ok(()) => {
                self.delivery_log
                    .record(event, &to, DeliveryStatus::Success, None, 0)
                    .await?;
                metrics::counter!("notibus_deliveries_total", "channel" => "email", "status" => "success")
                    .increment(1);
                info!(to = %to, "email notification sent");
                Ok(())
            }
            Err(retry::RetryError { error, retries }) => {
                error!(to = %to, error = %error, retries, "email notification failed");
                self.delivery_log
                    .record(
                        event,
                        &to,
                        DeliveryStatus::Failed,
                        Some(&error.to_string()),
                        retries,
                    )
                    .await?;
                metrics::counter!("notibus_deliveries_total", "channel" => "email", "status" => "failure")
                    .increment(1);
                Err(error)
            }
        }
    }
}
