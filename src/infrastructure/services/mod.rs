//! Application services

mod categorization;
mod result_cache;

pub use categorization::{
    CategorizationConfig, CategorizationService, CategorizationServiceTrait,
};
pub use result_cache::{ResultCacheConfig, ResultCacheService};
