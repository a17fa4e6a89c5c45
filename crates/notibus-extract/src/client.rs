// SPDX-FileCopyrightText: 2026 Notibus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Groq chat-completions API.
//!
//! Sends one extraction request per job description and parses the
//! strict-JSON completion into a [`JobCreateEvent`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use notibus_config::model::ExtractorConfig;
use notibus_core::{JobCreateEvent, NotibusError, TextExtractor};

/// Instruction forcing a strict-JSON completion with fixed field names.
const SYSTEM_PROMPT: &str = "You are a data extraction assistant. Extract job details from the user's message into a strict JSON format.\n\
The JSON must have these fields: job_title, description, location, wage, contact_number.\n\
If a field is missing, use \"Not specified\".\n\
Return ONLY the JSON object.";

/// Groq-backed implementation of [`TextExtractor`].
#[derive(Debug, Clone)]
pub struct GroqExtractor {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl GroqExtractor {
    /// Creates a new extractor client. Requires `extractor.api_key`.
    pub fn new(config: &ExtractorConfig) -> Result<Self, NotibusError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                NotibusError::Config("extractor.api_key is required for job extraction".into())
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| NotibusError::Config(format!("invalid extractor API key: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| NotibusError::Extractor {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    /// Overrides the endpoint URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }
}

/// Parse a completion into a job event, tolerating code-fence wrapping.
pub(crate) fn parse_job(content: &str) -> Result<JobCreateEvent, NotibusError> {
    let cleaned = content.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    serde_json::from_str(cleaned)
        .map_err(|e| NotibusError::Parse(format!("malformed extraction response: {e}")))
}

#[async_trait]
impl TextExtractor for GroqExtractor {
    async fn extract_job(
        &self,
        text: &str,
        requester: &str,
    ) -> Result<JobCreateEvent, NotibusError> {
        if text.trim().is_empty() {
            return Err(NotibusError::Validation(
                "message is empty, cannot extract job details".into(),
            ));
        }

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": text},
            ],
            "temperature": 0.1,
            "response_format": {"type": "json_object"},
        });

        let response = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotibusError::Extractor {
                message: format!("extraction request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "extraction API error");
            return Err(NotibusError::Extractor {
                message: format!("extraction API returned {status}: {error_body}"),
                source: None,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            NotibusError::Parse(format!("malformed extraction response envelope: {e}"))
        })?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                NotibusError::Parse("extraction response contained no choices".into())
            })?;

        let mut event = parse_job(content)?;
        event.requester_whatsapp = requester.to_string();
        debug!(job_title = %event.job_title, "extracted job details");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor(url: String) -> GroqExtractor {
        GroqExtractor::new(&ExtractorConfig {
            api_key: Some("gsk_test".into()),
            api_url: "https://api.groq.com/openai/v1/chat/completions".into(),
            model: "llama-3.3-70b-versatile".into(),
        })
        .unwrap()
        .with_api_url(url)
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    const JOB_JSON: &str = r#"{
        "job_title": "Plumber",
        "description": "Fix a leak",
        "location": "Whitefield",
        "wage": "500rs/hour",
        "contact_number": "Not specified"
    }"#;

    #[test]
    fn new_requires_api_key() {
        let config = ExtractorConfig {
            api_key: None,
            ..ExtractorConfig::default()
        };
        assert!(GroqExtractor::new(&config).is_err());
    }

    #[test]
    fn parse_job_strips_code_fences() {
        let fenced = format!("```json\n{JOB_JSON}\n```");
        let job = parse_job(&fenced).unwrap();
        assert_eq!(job.job_title, "Plumber");
        assert_eq!(job.contact_number, "Not specified");
    }

    #[test]
    fn parse_job_rejects_non_json() {
        assert!(matches!(
            parse_job("sorry, I cannot help with that"),
            Err(NotibusError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn extracts_job_and_backfills_requester() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_string_contains("data extraction assistant"))
            .and(body_string_contains("json_object"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(JOB_JSON)))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = extractor(server.uri());
        let job = extractor
            .extract_job(
                "Need a plumber in Whitefield, 500rs/hour to fix a leak.",
                "whatsapp:+911234567890",
            )
            .await
            .unwrap();

        assert_eq!(job.job_title, "Plumber");
        assert_eq!(job.location, "Whitefield");
        assert_eq!(job.requester_whatsapp, "whatsapp:+911234567890");
    }

    #[tokio::test]
    async fn api_error_status_is_an_extractor_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = extractor(server.uri())
            .extract_job("a long enough job description", "whatsapp:+91")
            .await
            .unwrap_err();
        assert!(matches!(err, NotibusError::Extractor { .. }));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn non_json_completion_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("I could not parse that")),
            )
            .mount(&server)
            .await;

        let err = extractor(server.uri())
            .extract_job("a long enough job description", "whatsapp:+91")
            .await
            .unwrap_err();
        assert!(matches!(err, NotibusError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_input_fails_before_any_request() {
        let server = MockServer::start().await;
        // No mock mounted: a request would 404 and fail differently.
        let err = extractor(server.uri())
            .extract_job("   ", "whatsapp:+91")
            .await
            .unwrap_err();
        assert!(matches!(err, NotibusError::Validation(_)));
    }
}
