//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, EnrichmentSettings, LogFormat, LoggingConfig, ServerConfig,
    StorageSettings,
};
