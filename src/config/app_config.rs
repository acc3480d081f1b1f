use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub classifier: ClassifierSettings,
    pub cache: CacheSettings,
    pub categorization: CategorizationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Remote classifier settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Base URL of the OpenAI-compatible completions endpoint
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// API key; falls back to the CLASSIFIER_API_KEY environment variable
    pub api_key: Option<String>,
    /// Timeout budget for normal-priority requests
    pub timeout_secs: u64,
    /// Shorter budget for high-priority (interactive) requests
    pub high_priority_timeout_secs: u64,
    /// Additional attempts after the first failed call
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_initial_delay_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Cache tier settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Redis connection URL for the primary tier; unset = in-memory only
    pub redis_url: Option<String>,
    /// Key namespace prefix
    pub key_prefix: String,
    /// TTL for results produced by the remote classifier
    pub ttl_secs: u64,
    /// Shorter TTL for fallback-produced results
    pub fallback_ttl_secs: u64,
    /// Entry cap for the in-memory tier
    pub max_capacity: u64,
    /// How long a failing primary tier is skipped before being retried
    pub degraded_cooldown_secs: u64,
}

/// Orchestration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategorizationSettings {
    /// Whether the rule-based fallback runs when the remote classifier fails
    pub fallback_enabled: bool,
    /// Fixed confidence attached to fallback matches
    pub fallback_confidence: f32,
    /// Maximum items accepted in one bulk request
    pub bulk_max_items: usize,
    /// Concurrent in-flight categorizations during a bulk request
    pub bulk_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            model: "llama3-70b-8192".to_string(),
            api_key: None,
            timeout_secs: 30,
            high_priority_timeout_secs: 10,
            max_retries: 2,
            retry_initial_delay_ms: 250,
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "categorization".to_string(),
            ttl_secs: 300,
            fallback_ttl_secs: 60,
            max_capacity: 10_000,
            degraded_cooldown_secs: 30,
        }
    }
}

impl Default for CategorizationSettings {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            fallback_confidence: 0.4,
            bulk_max_items: 10,
            bulk_concurrency: 10,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Resolves the classifier API key from config or environment
    pub fn classifier_api_key(&self) -> Option<String> {
        self.classifier
            .api_key
            .clone()
            .or_else(|| std::env::var("CLASSIFIER_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_secs, 300);
        assert!(config.cache.fallback_ttl_secs < config.cache.ttl_secs);
        assert!(config.categorization.fallback_enabled);
        assert_eq!(config.categorization.bulk_max_items, 10);
    }

    #[test]
    fn test_high_priority_budget_is_tighter() {
        let config = ClassifierSettings::default();
        assert!(config.high_priority_timeout_secs < config.timeout_secs);
    }
}
