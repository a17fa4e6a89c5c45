// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `notibus serve` command implementation.
//!
//! Wires the delivery pipeline together: delivery log, live-socket
//! registry, channel senders, router, extraction client, stream
//! producers, conversation flow, gateway server, and the event ingestion
//! loop. Supports graceful shutdown on ctrl-c.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use notibus_broker::{DeadLetterForwarder, IngestLoop, JobStreamProducer, StreamConsumer};
use notibus_config::NotibusConfig;
use notibus_conversation::{ConversationFlow, RedisSessionStore};
use notibus_core::{DeliveryLog, NotibusError, RetryPolicy};
use notibus_email::EmailSender;
use notibus_extract::GroqExtractor;
use notibus_gateway::GatewayState;
use notibus_realtime::{RealtimeSender, SocketRegistry};
use notibus_router::NotificationRouter;
use notibus_storage::{Database, SqliteDeliveryLog};
use notibus_whatsapp::{TwilioClient, WhatsAppSender};

/// Runs the `notibus serve` command.
pub async fn run_serve(config: NotibusConfig) -> Result<(), NotibusError> {
    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "starting notibus serve");

    // Delivery audit log.
    let db = Database::open(&config.storage.database_path).await?;
    let delivery_log: Arc<dyn DeliveryLog> = Arc::new(SqliteDeliveryLog::new(db));
    info!(path = %config.storage.database_path, "delivery log opened");

    let retry_policy = RetryPolicy::new(config.retry.max_retries, config.retry.backoff_ms);

    // Live-socket registry and channel senders.
    let registry = Arc::new(SocketRegistry::new());
    let whatsapp = Arc::new(WhatsAppSender::new(
        TwilioClient::new(&config.twilio)?,
        delivery_log.clone(),
        retry_policy,
    ));
    let email = Arc::new(EmailSender::new(
        &config.email,
        delivery_log.clone(),
        retry_policy,
    )?);
    let realtime = Arc::new(RealtimeSender::new(registry.clone(), delivery_log.clone()));
    let router = Arc::new(NotificationRouter::new(whatsapp, email, realtime));

    // Conversation flow collaborators.
    let extractor = Arc::new(GroqExtractor::new(&config.extractor)?);
    let jobs = Arc::new(JobStreamProducer::connect(&config.broker).await?);
    let sessions = Arc::new(RedisSessionStore::connect(&config.session.url).await?);
    let conversation = Arc::new(ConversationFlow::new(
        sessions,
        router.clone(),
        extractor,
        jobs,
        config.session.key_prefix.clone(),
        Duration::from_secs(config.session.ttl_hours * 3600),
    ));
    info!("conversation flow initialized");

    // Event ingestion loop.
    let consumer = StreamConsumer::connect(&config.broker).await?;
    let dead_letter = Arc::new(DeadLetterForwarder::connect(&config.broker).await?);
    let ingest = IngestLoop::new(
        consumer,
        router.clone(),
        dead_letter,
        config.broker.max_in_flight,
    );
    info!(
        stream = %config.broker.stream,
        group = %config.broker.group,
        max_in_flight = config.broker.max_in_flight,
        "broker consumer connected"
    );

    // Gateway server.
    let state = GatewayState {
        conversation,
        registry,
        start_time: Instant::now(),
    };
    let gateway_config = config.gateway.clone();

    let mut ingest_task = tokio::spawn(ingest.run());
    let mut gateway_task =
        tokio::spawn(async move { notibus_gateway::start_server(&gateway_config, state).await });

    tokio::select! {
        result = &mut ingest_task => {
            gateway_task.abort();
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!(error = %e, "ingestion loop terminated");
                    Err(e)
                }
                Err(e) => Err(NotibusError::Internal(format!("ingestion task panicked: {e}"))),
            }
        }
        result = &mut gateway_task => {
            ingest_task.abort();
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    error!(error = %e, "gateway terminated");
                    Err(e)
                }
                Err(e) => Err(NotibusError::Internal(format!("gateway task panicked: {e}"))),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            ingest_task.abort();
            gateway_task.abort();
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("notibus={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
