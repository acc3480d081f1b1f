//! Categorization result caching service
//!
//! Thin typed layer over the cache stack. Keys are namespaced with the
//! taxonomy version and the configured model so a taxonomy edit or model
//! switch starts a clean key space instead of serving stale categorizations.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::cache::{Cache, CacheExt, Fingerprint};
use crate::domain::categorization::{CategorizationResult, ResultSource};
use crate::domain::DomainError;

/// Configuration for result caching
#[derive(Debug, Clone)]
pub struct ResultCacheConfig {
    /// Namespace prefix for cache keys
    pub namespace: String,
    /// TTL for results produced by the remote classifier
    pub ttl: Duration,
    /// Shorter TTL for fallback results, so a remote outage does not pin
    /// low-confidence categorizations for the full window
    pub fallback_ttl: Duration,
    /// Whether caching is enabled
    pub enabled: bool,
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            namespace: "results".to_string(),
            ttl: Duration::from_secs(300),
            fallback_ttl: Duration::from_secs(60),
            enabled: true,
        }
    }
}

impl ResultCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fallback_ttl(mut self, ttl: Duration) -> Self {
        self.fallback_ttl = ttl;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Cached categorization with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResult {
    result: CategorizationResult,
    model: String,
    cached_at: u64,
}

/// Service for caching categorization results
#[derive(Debug)]
pub struct ResultCacheService {
    cache: Arc<dyn Cache>,
    config: ResultCacheConfig,
    taxonomy_version: String,
    model: String,
}

impl ResultCacheService {
    pub fn new(
        cache: Arc<dyn Cache>,
        config: ResultCacheConfig,
        taxonomy_version: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            config,
            taxonomy_version: taxonomy_version.into(),
            model: model.into(),
        }
    }

    fn key(&self, fingerprint: &Fingerprint) -> String {
        format!(
            "{}:v{}:{}:{}",
            self.config.namespace, self.taxonomy_version, self.model, fingerprint
        )
    }

    /// Looks up a previously computed result
    pub async fn get(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<CategorizationResult>, DomainError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let key = self.key(fingerprint);
        let cached: Option<CachedResult> = self.cache.get(&key).await?;

        Ok(cached.map(|c| c.result))
    }

    /// Stores a computed result, with the TTL picked by its provenance
    pub async fn set(
        &self,
        fingerprint: &Fingerprint,
        result: &CategorizationResult,
    ) -> Result<(), DomainError> {
        if !self.config.enabled {
            return Ok(());
        }

        let ttl = match result.source {
            ResultSource::Fallback => self.config.fallback_ttl,
            _ => self.config.ttl,
        };

        let key = self.key(fingerprint);
        let cached = CachedResult {
            result: result.clone(),
            model: self.model.clone(),
            cached_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };

        self.cache.set(&key, &cached, ttl).await
    }
}
