//! PeerNest Categorization Service
//!
//! Categorizes free-text struggle submissions into the PeerNest support
//! taxonomy using a remote LLM classifier, with:
//! - Two-tier result caching (Redis + in-memory) keyed by text fingerprint
//! - Bounded retries and priority-derived timeouts on the remote call
//! - Deterministic rule-based fallback when the remote classifier fails
//! - Bulk categorization under a concurrency cap

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use api::state::AppState;
use domain::taxonomy::Taxonomy;
use infrastructure::cache::CacheFactory;
use infrastructure::classifier::{HttpClient, LlmClassifier, RuleBasedClassifier};
use infrastructure::services::{
    CategorizationConfig, CategorizationService, ResultCacheConfig, ResultCacheService,
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let taxonomy = Arc::new(Taxonomy::builtin());
    info!(
        "Taxonomy v{} loaded: {} main categories, {} subcategories",
        taxonomy.version(),
        taxonomy.main_category_count(),
        taxonomy.subcategory_count()
    );

    let cache = CacheFactory::new().create(&config.cache).await;

    let api_key = config.classifier_api_key();
    if api_key.is_none() {
        warn!("No classifier API key configured; remote classification will fail over to rules");
    }

    let remote = Arc::new(LlmClassifier::new(
        HttpClient::new(),
        taxonomy.clone(),
        &config.classifier,
        api_key,
    ));

    let fallback = Arc::new(RuleBasedClassifier::new(
        taxonomy.clone(),
        config.categorization.fallback_confidence,
    ));

    let result_cache = Arc::new(ResultCacheService::new(
        cache.clone(),
        ResultCacheConfig::default()
            .with_ttl(Duration::from_secs(config.cache.ttl_secs))
            .with_fallback_ttl(Duration::from_secs(config.cache.fallback_ttl_secs)),
        taxonomy.version().to_string(),
        config.classifier.model.clone(),
    ));

    let categorization = Arc::new(CategorizationService::new(
        remote,
        fallback,
        result_cache,
        CategorizationConfig {
            fallback_enabled: config.categorization.fallback_enabled,
            normal_timeout: Duration::from_secs(config.classifier.timeout_secs),
            high_priority_timeout: Duration::from_secs(config.classifier.high_priority_timeout_secs),
            bulk_max_items: config.categorization.bulk_max_items,
            bulk_concurrency: config.categorization.bulk_concurrency,
        },
    ));

    info!(
        "Categorization service initialized (model: {}, fallback: {})",
        config.classifier.model, config.categorization.fallback_enabled
    );

    Ok(AppState::new(categorization, taxonomy, cache))
}
