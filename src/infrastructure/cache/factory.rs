//! Cache factory for runtime tier selection

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::CacheSettings;
use crate::domain::cache::Cache;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};
use super::tiered::{TieredCache, TieredCacheConfig};

/// Factory for assembling the cache stack from configuration
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Builds the cache described by `settings`.
    ///
    /// With a Redis URL configured this is a [`TieredCache`] of Redis over
    /// the in-memory tier; without one (or when the initial Redis connection
    /// fails) the in-memory tier serves alone. Startup never fails on an
    /// unreachable Redis - the service degrades instead.
    pub async fn create(&self, settings: &CacheSettings) -> Arc<dyn Cache> {
        let in_memory_config = InMemoryCacheConfig::default()
            .with_max_capacity(settings.max_capacity)
            .with_default_ttl(Duration::from_secs(settings.ttl_secs));
        let secondary: Arc<dyn Cache> = Arc::new(InMemoryCache::with_config(in_memory_config));

        let Some(url) = settings.redis_url.clone() else {
            info!("No Redis URL configured, using in-memory cache only");
            return secondary;
        };

        let redis_config =
            RedisCacheConfig::new(url).with_key_prefix(settings.key_prefix.clone());

        match RedisCache::new(redis_config).await {
            Ok(primary) => {
                info!("Redis cache tier connected");
                let tiered_config = TieredCacheConfig::default().with_degraded_cooldown(
                    Duration::from_secs(settings.degraded_cooldown_secs),
                );
                Arc::new(TieredCache::with_config(
                    Arc::new(primary),
                    secondary,
                    tiered_config,
                ))
            }
            Err(e) => {
                warn!("Redis unavailable at startup, in-memory cache only: {}", e);
                secondary
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_factory_without_redis_url() {
        let factory = CacheFactory::new();
        let settings = CacheSettings::default();

        let cache = factory.create(&settings).await;

        cache
            .set("test", &"value", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("test").await.unwrap();
        assert_eq!(result, Some("value".to_string()));
    }
}
