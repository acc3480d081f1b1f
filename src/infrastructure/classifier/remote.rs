//! Remote LLM classifier client
//!
//! Talks to an OpenAI-compatible chat-completions endpoint, retries
//! transient failures per the configured policy and validates every
//! candidate the model names against the taxonomy before returning it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClassifierSettings;
use crate::domain::categorization::CategoryConfidence;
use crate::domain::classifier::{RemoteClassifier, RemoteClassifierError, RetryPolicy};
use crate::domain::taxonomy::Taxonomy;

use super::http_client::{HttpClientTrait, HttpError};
use super::prompt;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Chat-completions backed classifier
#[derive(Debug)]
pub struct LlmClassifier<C: HttpClientTrait> {
    client: C,
    taxonomy: Arc<Taxonomy>,
    auth_header: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl<C: HttpClientTrait> LlmClassifier<C> {
    pub fn new(
        client: C,
        taxonomy: Arc<Taxonomy>,
        settings: &ClassifierSettings,
        api_key: Option<String>,
    ) -> Self {
        let api_key = api_key.unwrap_or_else(|| "sk-placeholder".to_string());
        let retry = RetryPolicy::new(settings.max_retries)
            .with_initial_delay(settings.retry_initial_delay_ms);

        Self {
            client,
            taxonomy,
            auth_header: format!("Bearer {}", api_key),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            retry,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt::SYSTEM_PROMPT },
                { "role": "user", "content": prompt::categorization_prompt(text, &self.taxonomy) }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    fn parse_response(
        &self,
        json: serde_json::Value,
    ) -> Result<Vec<CategoryConfidence>, RemoteClassifierError> {
        let response: ChatResponse = serde_json::from_value(json).map_err(|e| {
            RemoteClassifierError::unparseable(format!("unexpected response shape: {}", e))
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RemoteClassifierError::unparseable("no completion content"))?;

        let stripped = strip_code_fences(&content);
        let json_text = extract_json_object(stripped)
            .ok_or_else(|| RemoteClassifierError::unparseable("no JSON object in reply"))?;

        let candidates: CandidateList = serde_json::from_str(json_text).map_err(|e| {
            RemoteClassifierError::unparseable(format!("invalid candidate JSON: {}", e))
        })?;

        let mut validated = Vec::new();

        for candidate in candidates.categories {
            match self.taxonomy.resolve_subcategory(&candidate.category) {
                Some(category) => {
                    validated.push(CategoryConfidence::new(category, candidate.confidence));
                }
                None => {
                    warn!("Model returned unknown category: {}", candidate.category);
                }
            }
        }

        if validated.is_empty() {
            return Err(RemoteClassifierError::unparseable(
                "no valid categories in response",
            ));
        }

        validated.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Remote classification parsed: {} valid categories",
            validated.len()
        );
        Ok(validated)
    }
}

#[async_trait]
impl<C: HttpClientTrait> RemoteClassifier for LlmClassifier<C> {
    async fn classify(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<Vec<CategoryConfidence>, RemoteClassifierError> {
        let url = self.completions_url();
        let body = self.build_request(text);
        let max_attempts = self.retry.max_retries + 1;
        let mut last_error = RemoteClassifierError::unavailable("no attempts made");

        for attempt in 0..max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.retry.delay_for_attempt(attempt - 1)).await;
                debug!("Retrying remote classification, attempt {}", attempt + 1);
            }

            match self.client.post_json(&url, self.headers(), &body, timeout).await {
                // Parse failures are final: the endpoint answered, retrying
                // the same prompt will not make the reply parseable
                Ok(json) => return self.parse_response(json),
                Err(e) => {
                    let error = map_http_error(e);

                    if !error.is_retryable() {
                        return Err(error);
                    }

                    warn!(
                        "Remote classification attempt {} failed: {}",
                        attempt + 1,
                        error
                    );
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }

    async fn probe(&self) -> bool {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": "ping" }],
            "max_tokens": 8,
        });

        self.client
            .post_json(&self.completions_url(), self.headers(), &body, PROBE_TIMEOUT)
            .await
            .is_ok()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn map_http_error(error: HttpError) -> RemoteClassifierError {
    match error {
        HttpError::Timeout => RemoteClassifierError::unavailable("request timed out"),
        HttpError::Transport(message) => RemoteClassifierError::unavailable(message),
        HttpError::Status { status, body } => match status {
            401 | 403 => {
                RemoteClassifierError::invalid_credentials(format!("HTTP {}: {}", status, body))
            }
            429 => RemoteClassifierError::unavailable(format!("HTTP 429: {}", body)),
            s if s >= 500 => RemoteClassifierError::unavailable(format!("HTTP {}: {}", s, body)),
            s => RemoteClassifierError::unparseable(format!(
                "remote rejected request: HTTP {}: {}",
                s, body
            )),
        },
        HttpError::Decode(message) => RemoteClassifierError::unparseable(message),
    }
}

fn strip_code_fences(content: &str) -> &str {
    let mut text = content.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Pulls the first balanced-looking JSON object out of mixed prose
fn extract_json_object(text: &str) -> Option<&str> {
    if serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return Some(text);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if end <= start {
        return None;
    }

    let candidate = &text[start..=end];
    serde_json::from_str::<serde_json::Value>(candidate)
        .ok()
        .map(|_| candidate)
}

// Chat-completions wire types

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
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateList {
    categories: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    category: String,
    confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::classifier::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "http://localhost:9100/v1/chat/completions";

    fn test_settings() -> ClassifierSettings {
        ClassifierSettings {
            base_url: "http://localhost:9100".to_string(),
            retry_initial_delay_ms: 1,
            ..Default::default()
        }
    }

    fn classifier(client: MockHttpClient) -> LlmClassifier<MockHttpClient> {
        LlmClassifier::new(
            client,
            Arc::new(Taxonomy::builtin()),
            &test_settings(),
            Some("test-key".to_string()),
        )
    }

    fn completion_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "llama3-70b-8192",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_classify_success() {
        let content = r#"{"categories": [
            {"category": "Anxiety & Panic", "confidence": 0.9},
            {"category": "Exam Anxiety", "confidence": 0.7}
        ]}"#;
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("I feel anxious about exams", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category.sub_id, "Anxiety & Panic");
        assert_eq!(
            result[0].category.main_id,
            "Mental Health - Emotional Regulation"
        );
        assert!((result[0].confidence - 0.9).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_classify_sorts_by_confidence() {
        let content = r#"{"categories": [
            {"category": "Exam Anxiety", "confidence": 0.4},
            {"category": "Anxiety & Panic", "confidence": 0.8}
        ]}"#;
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("anxious about my exams", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result[0].category.sub_id, "Anxiety & Panic");
        assert_eq!(result[1].category.sub_id, "Exam Anxiety");
    }

    #[tokio::test]
    async fn test_classify_strips_code_fences() {
        let content = "```json\n{\"categories\": [{\"category\": \"Pet Loss\", \"confidence\": 0.8}]}\n```";
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("my dog passed away", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result[0].category.sub_id, "Pet Loss");
    }

    #[tokio::test]
    async fn test_classify_extracts_json_from_prose() {
        let content = r#"Here is my analysis:
{"categories": [{"category": "Job Insecurity", "confidence": 0.75}]}
Hope this helps."#;
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("worried about layoffs at work", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result[0].category.sub_id, "Job Insecurity");
    }

    #[tokio::test]
    async fn test_unknown_categories_dropped() {
        let content = r#"{"categories": [
            {"category": "Anxiety & Panic", "confidence": 0.9},
            {"category": "Made Up Category", "confidence": 0.8}
        ]}"#;
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("feeling anxious", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category.sub_id, "Anxiety & Panic");
    }

    #[tokio::test]
    async fn test_all_unknown_is_unparseable() {
        let content = r#"{"categories": [{"category": "Nothing Real", "confidence": 0.9}]}"#;
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("some text here", Duration::from_secs(5))
            .await;

        assert!(matches!(
            result,
            Err(RemoteClassifierError::Unparseable { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_not_retried() {
        let client =
            MockHttpClient::new().with_response(TEST_URL, completion_reply("not json at all"));
        let classifier = classifier(client);

        let result = classifier
            .classify("some text here", Duration::from_secs(5))
            .await;

        assert!(matches!(
            result,
            Err(RemoteClassifierError::Unparseable { .. })
        ));
        assert_eq!(classifier.client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_server_error_retried_then_succeeds() {
        let content = r#"{"categories": [{"category": "Anxiety & Panic", "confidence": 0.9}]}"#;
        let client = MockHttpClient::new().with_sequence(
            TEST_URL,
            vec![
                Err(HttpError::Status {
                    status: 503,
                    body: "overloaded".to_string(),
                }),
                Ok(completion_reply(content)),
            ],
        );
        let classifier = classifier(client);

        let result = classifier
            .classify("feeling anxious today", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result[0].category.sub_id, "Anxiety & Panic");
        assert_eq!(classifier.client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_is_unavailable() {
        let client = MockHttpClient::new().with_error(
            TEST_URL,
            HttpError::Status {
                status: 500,
                body: "boom".to_string(),
            },
        );
        let classifier = classifier(client);

        let result = classifier
            .classify("some text here", Duration::from_secs(5))
            .await;

        assert!(matches!(
            result,
            Err(RemoteClassifierError::Unavailable { .. })
        ));
        // First attempt + max_retries
        assert_eq!(classifier.client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_credentials_error_not_retried() {
        let client = MockHttpClient::new().with_error(
            TEST_URL,
            HttpError::Status {
                status: 401,
                body: "bad key".to_string(),
            },
        );
        let classifier = classifier(client);

        let result = classifier
            .classify("some text here", Duration::from_secs(5))
            .await;

        assert!(matches!(
            result,
            Err(RemoteClassifierError::InvalidCredentials { .. })
        ));
        assert_eq!(classifier.client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_unavailable() {
        let client = MockHttpClient::new().with_error(TEST_URL, HttpError::Timeout);
        let classifier = classifier(client);

        let result = classifier
            .classify("some text here", Duration::from_secs(1))
            .await;

        assert!(matches!(
            result,
            Err(RemoteClassifierError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_confidence_clamped() {
        let content = r#"{"categories": [{"category": "Anxiety & Panic", "confidence": 3.5}]}"#;
        let client = MockHttpClient::new().with_response(TEST_URL, completion_reply(content));
        let classifier = classifier(client);

        let result = classifier
            .classify("feeling anxious", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result[0].confidence, 1.0);
    }

    #[tokio::test]
    async fn test_probe_reports_reachability() {
        let reachable = classifier(
            MockHttpClient::new().with_response(TEST_URL, completion_reply("pong")),
        );
        assert!(reachable.probe().await);

        let unreachable =
            classifier(MockHttpClient::new().with_error(TEST_URL, HttpError::Timeout));
        assert!(!unreachable.probe().await);
    }
}
