//! Categorization orchestration
//!
//! Single entry point for classifying a submission: cache lookup, remote
//! classification, rule-based fallback, taxonomy validation and cache
//! write-through, with provenance and timing attached to every result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::domain::cache::Fingerprint;
use crate::domain::categorization::{
    CategorizationRequest, CategorizationResult, Priority, ResultSource,
};
use crate::domain::classifier::{FallbackClassifier, RemoteClassifier, RemoteClassifierError};
use crate::domain::DomainError;

use super::result_cache::ResultCacheService;

/// Orchestration settings
#[derive(Debug, Clone)]
pub struct CategorizationConfig {
    /// Whether the rule-based fallback runs when the remote classifier fails
    pub fallback_enabled: bool,
    /// Remote timeout budget for normal-priority requests
    pub normal_timeout: Duration,
    /// Tighter budget for high-priority requests
    pub high_priority_timeout: Duration,
    /// Maximum items accepted in one bulk call
    pub bulk_max_items: usize,
    /// Concurrent in-flight categorizations during a bulk call
    pub bulk_concurrency: usize,
}

impl Default for CategorizationConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            normal_timeout: Duration::from_secs(30),
            high_priority_timeout: Duration::from_secs(10),
            bulk_max_items: 10,
            bulk_concurrency: 10,
        }
    }
}

/// Trait for the categorization service, for handler-level mocking
#[async_trait]
pub trait CategorizationServiceTrait: Send + Sync {
    /// Runs the full pipeline for one request
    async fn categorize(
        &self,
        request: CategorizationRequest,
    ) -> Result<CategorizationResult, DomainError>;

    /// Runs the pipeline over a batch; one item's failure never aborts the
    /// others and output order matches input order.
    async fn categorize_bulk(
        &self,
        requests: Vec<CategorizationRequest>,
    ) -> Result<Vec<Result<CategorizationResult, DomainError>>, DomainError>;

    /// Probes the remote classifier and reports reachability
    async fn remote_reachable(&self) -> bool;

    /// Last observed remote status without issuing a probe
    fn last_remote_status(&self) -> bool;

    fn model_name(&self) -> String;

    fn fallback_enabled(&self) -> bool;
}

/// The orchestrator
pub struct CategorizationService {
    remote: Arc<dyn RemoteClassifier>,
    fallback: Arc<dyn FallbackClassifier>,
    cache: Arc<ResultCacheService>,
    config: CategorizationConfig,
    remote_healthy: AtomicBool,
}

impl std::fmt::Debug for CategorizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategorizationService")
            .field("config", &self.config)
            .finish()
    }
}

impl CategorizationService {
    pub fn new(
        remote: Arc<dyn RemoteClassifier>,
        fallback: Arc<dyn FallbackClassifier>,
        cache: Arc<ResultCacheService>,
        config: CategorizationConfig,
    ) -> Self {
        Self {
            remote,
            fallback,
            cache,
            config,
            remote_healthy: AtomicBool::new(true),
        }
    }

    fn timeout_for(&self, priority: Priority) -> Duration {
        match priority {
            Priority::High => self.config.high_priority_timeout,
            Priority::Normal => self.config.normal_timeout,
        }
    }

    fn note_remote_outcome(&self, error: Option<&RemoteClassifierError>) {
        // Unparseable still means the endpoint answered
        let healthy = !matches!(
            error,
            Some(RemoteClassifierError::Unavailable { .. })
                | Some(RemoteClassifierError::InvalidCredentials { .. })
        );
        self.remote_healthy.store(healthy, Ordering::Relaxed);
    }
}

#[async_trait]
impl CategorizationServiceTrait for CategorizationService {
    async fn categorize(
        &self,
        request: CategorizationRequest,
    ) -> Result<CategorizationResult, DomainError> {
        let start = Instant::now();
        let fingerprint = Fingerprint::of(request.text());

        // Cache failures degrade to a miss, never to a request failure
        match self.cache.get(&fingerprint).await {
            Ok(Some(result)) => {
                info!(session = request.session_id(), "Cache hit");
                return Ok(result
                    .with_source(ResultSource::Cache)
                    .with_processing_time(start.elapsed().as_millis() as u64));
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed, treating as miss: {}", e),
        }

        let timeout = self.timeout_for(request.priority());

        let result = match self.remote.classify(request.text(), timeout).await {
            Ok(categories) => {
                self.note_remote_outcome(None);
                CategorizationResult::new(categories, ResultSource::Llm)
            }
            Err(e) => {
                self.note_remote_outcome(Some(&e));
                warn!("Remote classification failed: {}", e);

                if !self.config.fallback_enabled {
                    return Err(DomainError::fallback_exhausted(format!(
                        "remote classifier failed and fallback is disabled: {}",
                        e
                    )));
                }

                info!("Using rule-based fallback categorization");
                CategorizationResult::new(self.fallback.classify(request.text()), ResultSource::Fallback)
            }
        };

        // Best-effort write-through
        if let Err(e) = self.cache.set(&fingerprint, &result).await {
            warn!("Cache write failed: {}", e);
        }

        Ok(result.with_processing_time(start.elapsed().as_millis() as u64))
    }

    async fn categorize_bulk(
        &self,
        requests: Vec<CategorizationRequest>,
    ) -> Result<Vec<Result<CategorizationResult, DomainError>>, DomainError> {
        if requests.is_empty() {
            return Err(DomainError::invalid_input("At least one request is required"));
        }

        if requests.len() > self.config.bulk_max_items {
            return Err(DomainError::invalid_input(format!(
                "Bulk requests are limited to {} items",
                self.config.bulk_max_items
            )));
        }

        info!("Processing bulk categorization for {} requests", requests.len());

        let semaphore = Arc::new(Semaphore::new(self.config.bulk_concurrency));

        let tasks = requests.into_iter().map(|request| {
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| DomainError::internal("bulk semaphore closed"))?;
                self.categorize(request).await
            }
        });

        // join_all keeps input order regardless of completion order
        Ok(join_all(tasks).await)
    }

    async fn remote_reachable(&self) -> bool {
        let reachable = self.remote.probe().await;
        self.remote_healthy.store(reachable, Ordering::Relaxed);
        reachable
    }

    fn last_remote_status(&self) -> bool {
        self.remote_healthy.load(Ordering::Relaxed)
    }

    fn model_name(&self) -> String {
        self.remote.model_name().to_string()
    }

    fn fallback_enabled(&self) -> bool {
        self.config.fallback_enabled
    }
}
