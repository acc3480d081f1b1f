//! Classifier contracts
//!
//! Seams between the orchestration layer and the two classifier
//! implementations: the remote LLM client and the deterministic rule-based
//! fallback.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::categorization::CategoryConfidence;

/// Failures of the remote classifier, as seen by the orchestrator
#[derive(Debug, Clone, Error)]
pub enum RemoteClassifierError {
    /// Network error, timeout or server-side failure after exhausted retries
    #[error("Remote classifier unavailable: {message}")]
    Unavailable { message: String },

    /// Credentials rejected. Fatal - retrying cannot help.
    #[error("Remote classifier credentials rejected: {message}")]
    InvalidCredentials { message: String },

    /// The model responded but the output was unusable
    #[error("Remote classifier response unusable: {message}")]
    Unparseable { message: String },
}

impl RemoteClassifierError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
        }
    }

    pub fn unparseable(message: impl Into<String>) -> Self {
        Self::Unparseable {
            message: message.into(),
        }
    }

    /// Only availability failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Remote classifier seam
#[async_trait]
pub trait RemoteClassifier: Send + Sync + Debug {
    /// Classifies `text` within the given timeout budget.
    ///
    /// Returned candidates are taxonomy-valid and sorted by descending
    /// confidence; an empty list never comes back as a success.
    async fn classify(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<Vec<CategoryConfidence>, RemoteClassifierError>;

    /// Cheap reachability probe for the readiness check
    async fn probe(&self) -> bool;

    fn model_name(&self) -> &str;
}

/// Rule-based fallback classifier seam
///
/// Pure and infallible: implementations must return at least one category for
/// any input, including empty text.
pub trait FallbackClassifier: Send + Sync + Debug {
    fn classify(&self, text: &str) -> Vec<CategoryConfidence>;
}

/// Retry policy for the remote call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Ceiling on the backoff delay
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 250,
            max_delay_ms: 4000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(self.initial_delay_ms);
        }

        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Mock remote classifier for orchestrator tests
    #[derive(Debug)]
    pub struct MockRemoteClassifier {
        response: Option<Vec<CategoryConfidence>>,
        error: Option<RemoteClassifierError>,
        reachable: bool,
        calls: AtomicU32,
    }

    impl Default for MockRemoteClassifier {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockRemoteClassifier {
        pub fn new() -> Self {
            Self {
                response: None,
                error: None,
                reachable: true,
                calls: AtomicU32::new(0),
            }
        }

        pub fn with_response(mut self, response: Vec<CategoryConfidence>) -> Self {
            self.response = Some(response);
            self
        }

        pub fn with_error(mut self, error: RemoteClassifierError) -> Self {
            self.error = Some(error);
            self
        }

        pub fn with_reachable(mut self, reachable: bool) -> Self {
            self.reachable = reachable;
            self
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl RemoteClassifier for MockRemoteClassifier {
        async fn classify(
            &self,
            _text: &str,
            _timeout: Duration,
        ) -> Result<Vec<CategoryConfidence>, RemoteClassifierError> {
            self.calls.fetch_add(1, Ordering::Relaxed);

            if let Some(error) = self.error.clone() {
                return Err(error);
            }

            self.response
                .clone()
                .ok_or_else(|| RemoteClassifierError::unavailable("no mock response configured"))
        }

        async fn probe(&self) -> bool {
            self.reachable
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_calculation() {
        let policy = RetryPolicy::default()
            .with_initial_delay(100)
            .with_backoff_multiplier(2.0)
            .with_max_delay(1000);

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(1000));
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(RemoteClassifierError::unavailable("503").is_retryable());
        assert!(!RemoteClassifierError::invalid_credentials("401").is_retryable());
        assert!(!RemoteClassifierError::unparseable("not json").is_retryable());
    }
}
