//! Cache implementations

mod factory;
mod in_memory;
mod redis;
mod tiered;

pub use factory::CacheFactory;
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use redis::{RedisCache, RedisCacheConfig};
pub use tiered::{TieredCache, TieredCacheConfig};
