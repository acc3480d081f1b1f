//! Tiered cache - distributed primary with transparent in-process fallback
//!
//! Composes two [`Cache`] implementations behind the same trait. Reads try
//! the primary first and fall through to the secondary both on miss and on
//! primary unavailability; writes go to both tiers so the secondary can serve
//! reads while the primary is down. A failing primary is marked degraded for
//! a cooldown window and skipped entirely until the window passes, so a
//! sustained outage does not cost a failed connection attempt per request.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Configuration for the tiered cache
#[derive(Debug, Clone)]
pub struct TieredCacheConfig {
    /// How long the primary tier is skipped after an observed failure
    pub degraded_cooldown: Duration,
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            degraded_cooldown: Duration::from_secs(30),
        }
    }
}

impl TieredCacheConfig {
    pub fn with_degraded_cooldown(mut self, cooldown: Duration) -> Self {
        self.degraded_cooldown = cooldown;
        self
    }
}

/// Marks the primary tier degraded for a cooldown window after a failure
#[derive(Debug)]
struct TierBreaker {
    degraded_until_ms: AtomicU64,
    cooldown_ms: u64,
}

impl TierBreaker {
    fn new(cooldown: Duration) -> Self {
        Self {
            degraded_until_ms: AtomicU64::new(0),
            cooldown_ms: cooldown.as_millis() as u64,
        }
    }

    fn is_degraded(&self) -> bool {
        current_time_ms() < self.degraded_until_ms.load(Ordering::Relaxed)
    }

    fn record_failure(&self) {
        self.degraded_until_ms
            .store(current_time_ms() + self.cooldown_ms, Ordering::Relaxed);
    }

    fn record_success(&self) {
        self.degraded_until_ms.store(0, Ordering::Relaxed);
    }
}

fn current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Primary-then-secondary cache decorator
pub struct TieredCache {
    primary: Arc<dyn Cache>,
    secondary: Arc<dyn Cache>,
    breaker: TierBreaker,
}

impl fmt::Debug for TieredCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TieredCache")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("degraded", &self.breaker.is_degraded())
            .finish()
    }
}

impl TieredCache {
    pub fn new(primary: Arc<dyn Cache>, secondary: Arc<dyn Cache>) -> Self {
        Self::with_config(primary, secondary, TieredCacheConfig::default())
    }

    pub fn with_config(
        primary: Arc<dyn Cache>,
        secondary: Arc<dyn Cache>,
        config: TieredCacheConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            breaker: TierBreaker::new(config.degraded_cooldown),
        }
    }

    /// Whether the primary tier is currently in its degraded cooldown
    pub fn primary_degraded(&self) -> bool {
        self.breaker.is_degraded()
    }
}

#[async_trait]
impl Cache for TieredCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        if !self.breaker.is_degraded() {
            match self.primary.get_raw(key).await {
                Ok(Some(value)) => {
                    self.breaker.record_success();
                    return Ok(Some(value));
                }
                Ok(None) => {
                    self.breaker.record_success();
                }
                Err(e) => {
                    warn!("Primary cache tier unavailable on get: {}", e);
                    self.breaker.record_failure();
                }
            }
        } else {
            debug!("Primary cache tier degraded, reading from secondary");
        }

        self.secondary.get_raw(key).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        if !self.breaker.is_degraded() {
            match self.primary.set_raw(key, value, ttl).await {
                Ok(()) => self.breaker.record_success(),
                Err(e) => {
                    warn!("Primary cache tier unavailable on set: {}", e);
                    self.breaker.record_failure();
                }
            }
        }

        self.secondary.set_raw(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut deleted = false;

        if !self.breaker.is_degraded() {
            match self.primary.delete(key).await {
                Ok(existed) => {
                    self.breaker.record_success();
                    deleted |= existed;
                }
                Err(e) => {
                    warn!("Primary cache tier unavailable on delete: {}", e);
                    self.breaker.record_failure();
                }
            }
        }

        deleted |= self.secondary.delete(key).await?;
        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        if !self.breaker.is_degraded() {
            if let Err(e) = self.primary.clear().await {
                warn!("Primary cache tier unavailable on clear: {}", e);
                self.breaker.record_failure();
            } else {
                self.breaker.record_success();
            }
        }

        self.secondary.clear().await
    }

    async fn size(&self) -> Result<usize, DomainError> {
        if !self.breaker.is_degraded() {
            match self.primary.size().await {
                Ok(size) => {
                    self.breaker.record_success();
                    return Ok(size);
                }
                Err(e) => {
                    warn!("Primary cache tier unavailable on size: {}", e);
                    self.breaker.record_failure();
                }
            }
        }

        self.secondary.size().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheExt, MockCache};

    fn tiered_with_cooldown(
        primary: Arc<MockCache>,
        secondary: Arc<MockCache>,
        cooldown: Duration,
    ) -> TieredCache {
        TieredCache::with_config(
            primary,
            secondary,
            TieredCacheConfig::default().with_degraded_cooldown(cooldown),
        )
    }

    #[tokio::test]
    async fn test_primary_hit_preferred() {
        let primary = Arc::new(MockCache::new());
        let secondary = Arc::new(MockCache::new());

        primary
            .set("key", &"from-primary", Duration::from_secs(60))
            .await
            .unwrap();
        secondary
            .set("key", &"from-secondary", Duration::from_secs(60))
            .await
            .unwrap();

        let cache = TieredCache::new(primary, secondary);

        let value: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(value, Some("from-primary".to_string()));
    }

    #[tokio::test]
    async fn test_miss_in_both_is_miss() {
        let cache = TieredCache::new(Arc::new(MockCache::new()), Arc::new(MockCache::new()));

        let value: Option<String> = cache.get("missing").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_primary_unavailable_falls_through_on_get() {
        let primary = Arc::new(MockCache::new().with_error("connection refused"));
        let secondary = Arc::new(MockCache::new());

        secondary
            .set("key", &"from-secondary", Duration::from_secs(60))
            .await
            .unwrap();

        let cache = TieredCache::new(primary, secondary);

        let value: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(value, Some("from-secondary".to_string()));
        assert!(cache.primary_degraded());
    }

    #[tokio::test]
    async fn test_primary_unavailable_set_goes_to_secondary() {
        let primary = Arc::new(MockCache::new().with_error("connection refused"));
        let secondary = Arc::new(MockCache::new());

        let cache = TieredCache::new(primary, secondary.clone());

        cache
            .set("key", &"value", Duration::from_secs(60))
            .await
            .unwrap();

        let value: Option<String> = secondary.get("key").await.unwrap();
        assert_eq!(value, Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_healthy_set_writes_both_tiers() {
        let primary = Arc::new(MockCache::new());
        let secondary = Arc::new(MockCache::new());

        let cache = TieredCache::new(primary.clone(), secondary.clone());

        cache
            .set("key", &"value", Duration::from_secs(60))
            .await
            .unwrap();

        let from_primary: Option<String> = primary.get("key").await.unwrap();
        let from_secondary: Option<String> = secondary.get("key").await.unwrap();
        assert_eq!(from_primary, Some("value".to_string()));
        assert_eq!(from_secondary, Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_cooldown_skips_recovered_primary() {
        let primary = Arc::new(MockCache::new().with_error("connection refused"));
        let secondary = Arc::new(MockCache::new());

        let cache =
            tiered_with_cooldown(primary.clone(), secondary.clone(), Duration::from_secs(60));

        // Trip the breaker
        let _: Option<String> = cache.get("key").await.unwrap();
        assert!(cache.primary_degraded());

        // Primary recovers, but inside the cooldown the tier is still skipped
        primary.set_error(None);
        cache
            .set("key", &"value", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(primary.size().await.unwrap(), 0);
        assert_eq!(secondary.size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_primary_resumes_after_cooldown() {
        let primary = Arc::new(MockCache::new().with_error("connection refused"));
        let secondary = Arc::new(MockCache::new());

        let cache =
            tiered_with_cooldown(primary.clone(), secondary.clone(), Duration::from_millis(20));

        let _: Option<String> = cache.get("key").await.unwrap();
        assert!(cache.primary_degraded());

        primary.set_error(None);
        tokio::time::sleep(Duration::from_millis(50)).await;

        cache
            .set("key", &"value", Duration::from_secs(60))
            .await
            .unwrap();

        let value: Option<String> = primary.get("key").await.unwrap();
        assert_eq!(value, Some("value".to_string()));
        assert!(!cache.primary_degraded());
    }

    #[tokio::test]
    async fn test_primary_miss_falls_through_to_secondary() {
        let primary = Arc::new(MockCache::new());
        let secondary = Arc::new(MockCache::new());

        secondary
            .set("key", &"warm", Duration::from_secs(60))
            .await
            .unwrap();

        let cache = TieredCache::new(primary, secondary);

        let value: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(value, Some("warm".to_string()));
    }
}
