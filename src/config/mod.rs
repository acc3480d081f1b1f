mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, CategorizationSettings, ClassifierSettings, LogFormat,
    LoggingConfig, ServerConfig,
};
