// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-identity conversation state machine for guided job posting.
//!
//! States: IDLE -> AWAITING_CONFIRMATION -> AWAITING_DETAILS -> IDLE.
//! Reset commands return to IDLE from any state. Every inbound message
//! refreshes the session TTL to the full window, state change or not.
//!
//! All outbound prompts go through the notification router as CHAT
//! events addressed back to the originating identity; the flow is itself
//! a producer into the same delivery pipeline.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strum::{Display, EnumString};
use tracing::{debug, error, info};

use notibus_core::{
    ConversationHandler, Destination, JobProducer, NotibusError, NotificationEvent,
    NotificationSource, SessionStore, TextExtractor,
};
use notibus_router::NotificationRouter;

use crate::prompts;

/// Job descriptions shorter than this are bounced back for more detail.
const MIN_DETAILS_LEN: usize = 10;

/// Stored conversation state values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ConversationState {
    #[strum(to_string = "IDLE")]
    Idle,
    #[strum(to_string = "AWAITING_CONFIRMATION")]
    AwaitingConfirmation,
    #[strum(to_string = "AWAITING_DETAILS")]
    AwaitingDetails,
}

/// Drives the guided dialogue over inbound chat messages.
pub struct ConversationFlow {
    store: Arc<dyn SessionStore>,
    router: Arc<NotificationRouter>,
    extractor: Arc<dyn TextExtractor>,
    jobs: Arc<dyn JobProducer>,
    key_prefix: String,
    session_ttl: Duration,
}

impl ConversationFlow {
    pub fn new(
        store: Arc<dyn SessionStore>,
        router: Arc<NotificationRouter>,
        extractor: Arc<dyn TextExtractor>,
        jobs: Arc<dyn JobProducer>,
        key_prefix: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            store,
            router,
            extractor,
            jobs,
            key_prefix,
            session_ttl,
        }
    }

    fn session_key(&self, from: &str) -> String {
        format!("{}{from}", self.key_prefix)
    }

    async fn process(&self, from: &str, body: &str) -> Result<(), NotibusError> {
        let input = body.trim();
        let key = self.session_key(from);

        if is_reset_command(input) {
            return self.reset(from, &key, prompts::RESET_CONFIRMATION).await;
        }

        let stored = self.store.get(&key).await?;
        self.store.refresh(&key, self.session_ttl).await?;

        let state = match stored.as_deref() {
            None => ConversationState::Idle,
            Some(raw) => match ConversationState::from_str(raw) {
                Ok(state) => state,
                Err(_) => {
                    // Corrupted or version-skewed state value.
                    debug!(from, stored = raw, "unrecognized session state, resetting");
                    return self.reset(from, &key, prompts::RESET_CONFIRMATION).await;
                }
            },
        };

        match state {
            ConversationState::Idle => self.handle_main_menu(from, input, &key).await,
            ConversationState::AwaitingConfirmation => {
                self.handle_confirmation(from, input, &key).await
            }
            ConversationState::AwaitingDetails => self.handle_job_details(from, input, &key).await,
        }
    }

    async fn handle_main_menu(
        &self,
        from: &str,
        input: &str,
        key: &str,
    ) -> Result<(), NotibusError> {
        let lower = input.to_lowercase();
        if input == "1" || lower.contains("job") || lower.contains("hi") {
            self.set_state(key, ConversationState::AwaitingConfirmation)
                .await?;
            return self.reply(from, prompts::CONFIRMATION_PROMPT).await;
        }

        // No state write: the session stays (or remains implicit) IDLE.
        self.reply(from, prompts::MAIN_MENU).await
    }

    async fn handle_confirmation(
        &self,
        from: &str,
        input: &str,
        key: &str,
    ) -> Result<(), NotibusError> {
        if input == "1" || input.eq_ignore_ascii_case("yes") {
            self.set_state(key, ConversationState::AwaitingDetails)
                .await?;
            return self.reply(from, prompts::DETAILS_PROMPT).await;
        }
        if input == "2" || input.eq_ignore_ascii_case("no") {
            return self.reset(from, key, prompts::DECLINE_ACK).await;
        }

        self.reply(from, prompts::INVALID_OPTION).await
    }

    async fn handle_job_details(
        &self,
        from: &str,
        input: &str,
        key: &str,
    ) -> Result<(), NotibusError> {
        if input.chars().count() < MIN_DETAILS_LEN {
            return self.reply(from, prompts::TOO_SHORT).await;
        }

        self.reply(from, prompts::PROCESSING).await?;

        let published = async {
            let job = self.extractor.extract_job(input, from).await?;
            self.jobs.publish(&job).await?;
            Ok::<_, NotibusError>(job)
        }
        .await;

        match published {
            Ok(job) => {
                info!(from, job_title = %job.job_title, "job created from conversation");
                self.set_state(key, ConversationState::Idle).await?;
                self.reply(from, &prompts::success_summary(&job)).await
            }
            Err(e) => {
                // State is left at AWAITING_DETAILS so the user can retry.
                error!(from, error = %e, "job extraction failed");
                self.reply(from, prompts::EXTRACTION_RETRY).await
            }
        }
    }

    async fn set_state(&self, key: &str, state: ConversationState) -> Result<(), NotibusError> {
        self.store
            .set(key, &state.to_string(), self.session_ttl)
            .await
    }

    async fn reset(&self, from: &str, key: &str, message: &str) -> Result<(), NotibusError> {
        self.store.delete(key).await?;
        self.reply(from, message).await
    }

    /// Send a prompt back to the originating identity through the
    /// delivery pipeline.
    async fn reply(&self, to: &str, message: &str) -> Result<(), NotibusError> {
        let event = NotificationEvent {
            user_name: "System".into(),
            username: "system".into(),
            subject: "Reply".into(),
            source: NotificationSource::Chat,
            destination: Some(Destination {
                whatsapp_number: Some(to.to_string()),
                email: None,
                user_id: None,
            }),
            message: message.to_string(),
            metadata: None,
        };
        self.router.route(&event).await
    }
}

fn is_reset_command(input: &str) -> bool {
    input == "0" || input.eq_ignore_ascii_case("reset") || input.eq_ignore_ascii_case("clear")
}

#[async_trait]
impl ConversationHandler for ConversationFlow {
    async fn handle_message(&self, from: &str, body: &str) -> Result<(), NotibusError> {
        self.process(from, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notibus_core::JobCreateEvent;
    use notibus_test_utils::{
        CapturingSender, MemorySessionStore, RecordingJobProducer, StaticExtractor,
    };

    const FROM: &str = "whatsapp:+911234567890";
    const KEY: &str = "whatsapp:state:whatsapp:+911234567890";
    const DETAILS: &str = "Need a plumber in Whitefield, 500rs/hour to fix a leak.";

    struct Harness {
        flow: ConversationFlow,
        chat: Arc<CapturingSender>,
        store: Arc<MemorySessionStore>,
        jobs: Arc<RecordingJobProducer>,
        extractor: Arc<StaticExtractor>,
    }

    fn harness(extractor: StaticExtractor) -> Harness {
        let chat = Arc::new(CapturingSender::new("whatsapp"));
        let email = Arc::new(CapturingSender::new("email"));
        let realtime = Arc::new(CapturingSender::new("realtime"));
        let router = Arc::new(NotificationRouter::new(
            chat.clone(),
            email.clone(),
            realtime.clone(),
        ));
        let store = Arc::new(MemorySessionStore::new());
        let jobs = Arc::new(RecordingJobProducer::new());
        let extractor = Arc::new(extractor);

        let flow = ConversationFlow::new(
            store.clone(),
            router,
            extractor.clone(),
            jobs.clone(),
            "whatsapp:state:".into(),
            Duration::from_secs(24 * 60 * 60),
        );
        Harness {
            flow,
            chat,
            store,
            jobs,
            extractor,
        }
    }

    fn extracted_job() -> JobCreateEvent {
        JobCreateEvent {
            job_title: "Plumber".into(),
            description: "Fix a leak".into(),
            location: "Whitefield".into(),
            wage: "500rs/hour".into(),
            contact_number: "Not specified".into(),
            requester_whatsapp: String::new(),
        }
    }

    #[tokio::test]
    async fn full_flow_reaches_idle_and_publishes_job() {
        let h = harness(StaticExtractor::succeeding(extracted_job()));

        h.flow.handle_message(FROM, "hi").await.unwrap();
        assert_eq!(h.store.value(KEY).as_deref(), Some("AWAITING_CONFIRMATION"));

        h.flow.handle_message(FROM, "1").await.unwrap();
        assert_eq!(h.store.value(KEY).as_deref(), Some("AWAITING_DETAILS"));

        h.flow.handle_message(FROM, DETAILS).await.unwrap();
        assert_eq!(h.store.value(KEY).as_deref(), Some("IDLE"));

        let published = h.jobs.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].job_title, "Plumber");
        assert_eq!(published[0].requester_whatsapp, FROM);

        // Prompts: confirmation, details request, processing ack, summary.
        let messages = h.chat.messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].contains("Do you want to post a new job?"));
        assert!(messages[1].contains("describe the job details"));
        assert!(messages[2].contains("Processing details"));
        assert!(messages[3].contains("Job Created Successfully"));
    }

    #[tokio::test]
    async fn replies_are_chat_events_to_the_originating_identity() {
        let h = harness(StaticExtractor::failing());
        h.flow.handle_message(FROM, "anything").await.unwrap();

        let sent = h.chat.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].source, NotificationSource::Chat);
        assert_eq!(sent[0].user_name, "System");
        assert_eq!(sent[0].username, "system");
        assert_eq!(sent[0].subject, "Reply");
        assert_eq!(
            sent[0]
                .destination
                .as_ref()
                .unwrap()
                .whatsapp_number
                .as_deref(),
            Some(FROM)
        );
    }

    #[tokio::test]
    async fn unmatched_idle_input_shows_menu_without_state_write() {
        let h = harness(StaticExtractor::failing());
        h.flow.handle_message(FROM, "what's the weather").await.unwrap();

        assert!(h.store.value(KEY).is_none());
        assert!(h.chat.messages()[0].contains("Welcome! How can I help you?"));
    }

    #[tokio::test]
    async fn keyword_variants_start_the_flow() {
        for input in ["1", "I need a JOB", "hi there"] {
            let h = harness(StaticExtractor::failing());
            h.flow.handle_message(FROM, input).await.unwrap();
            assert_eq!(
                h.store.value(KEY).as_deref(),
                Some("AWAITING_CONFIRMATION"),
                "input {input:?}"
            );
        }
    }

    #[tokio::test]
    async fn reset_commands_clear_the_session_from_any_state() {
        for (state, command) in [
            ("AWAITING_CONFIRMATION", "0"),
            ("AWAITING_DETAILS", "reset"),
            ("IDLE", "CLEAR"),
        ] {
            let h = harness(StaticExtractor::failing());
            h.store
                .set(KEY, state, Duration::from_secs(60))
                .await
                .unwrap();

            h.flow.handle_message(FROM, command).await.unwrap();
            assert!(h.store.value(KEY).is_none(), "state {state}");
            assert!(h.chat.messages()[0].contains("Memory cleared"));
        }
    }

    #[tokio::test]
    async fn declining_confirmation_clears_the_session() {
        let h = harness(StaticExtractor::failing());
        h.store
            .set(KEY, "AWAITING_CONFIRMATION", Duration::from_secs(60))
            .await
            .unwrap();

        h.flow.handle_message(FROM, "no").await.unwrap();
        assert!(h.store.value(KEY).is_none());
        assert!(h.chat.messages()[0].contains("No problem"));
    }

    #[tokio::test]
    async fn invalid_confirmation_option_keeps_state() {
        let h = harness(StaticExtractor::failing());
        h.store
            .set(KEY, "AWAITING_CONFIRMATION", Duration::from_secs(60))
            .await
            .unwrap();

        h.flow.handle_message(FROM, "maybe").await.unwrap();
        assert_eq!(h.store.value(KEY).as_deref(), Some("AWAITING_CONFIRMATION"));
        assert!(h.chat.messages()[0].contains("Invalid option"));
    }

    #[tokio::test]
    async fn short_details_do_not_reach_the_extractor() {
        let h = harness(StaticExtractor::succeeding(extracted_job()));
        h.store
            .set(KEY, "AWAITING_DETAILS", Duration::from_secs(60))
            .await
            .unwrap();

        h.flow.handle_message(FROM, "too short").await.unwrap();

        assert_eq!(h.store.value(KEY).as_deref(), Some("AWAITING_DETAILS"));
        assert_eq!(h.extractor.call_count(), 0);
        assert!(h.jobs.published().is_empty());
        assert!(h.chat.messages()[0].contains("too short"));
    }

    #[tokio::test]
    async fn extraction_failure_keeps_state_and_asks_for_retry() {
        let h = harness(StaticExtractor::failing());
        h.store
            .set(KEY, "AWAITING_DETAILS", Duration::from_secs(60))
            .await
            .unwrap();

        h.flow.handle_message(FROM, DETAILS).await.unwrap();

        assert_eq!(h.store.value(KEY).as_deref(), Some("AWAITING_DETAILS"));
        assert!(h.jobs.published().is_empty());
        let messages = h.chat.messages();
        assert!(messages[0].contains("Processing details"));
        assert!(messages[1].contains("try describing the job again"));
    }

    #[tokio::test]
    async fn unknown_stored_state_resets_the_session() {
        let h = harness(StaticExtractor::failing());
        h.store
            .set(KEY, "AWAITING_SOMETHING_ELSE", Duration::from_secs(60))
            .await
            .unwrap();

        h.flow.handle_message(FROM, "hello").await.unwrap();
        assert!(h.store.value(KEY).is_none());
        assert!(h.chat.messages()[0].contains("Memory cleared"));
    }

    #[tokio::test]
    async fn every_non_reset_message_refreshes_the_ttl() {
        let h = harness(StaticExtractor::failing());
        h.flow.handle_message(FROM, "hello").await.unwrap();
        h.flow.handle_message(FROM, "hi").await.unwrap();
        assert_eq!(h.store.refresh_count(), 2);
    }
}
