use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Book storage backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// `in_memory` or `postgres`
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// PostgreSQL URL, falls back to `DATABASE_URL`
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Enrichment cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub key_prefix: Option<String>,
    /// Lifetime of a cached metadata record
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

/// External metadata API settings
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_storage_backend() -> String {
    "in_memory".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_cache_backend() -> String {
    "in_memory".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_api_url() -> String {
    "https://www.googleapis.com/books/v1/volumes".to_string()
}

fn default_timeout_secs() -> u64 {
    10
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

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            redis_url: None,
            key_prefix: None,
            ttl_secs: default_cache_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_secs, 86_400);
        assert_eq!(config.cache.backend, "in_memory");
        assert_eq!(config.storage.backend, "in_memory");
        assert_eq!(
            config.enrichment.api_url,
            "https://www.googleapis.com/books/v1/volumes"
        );
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let json = r#"{
            "cache": { "backend": "redis", "redis_url": "redis://cache:6379" },
            "logging": { "level": "debug", "format": "json" }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.cache.backend, "redis");
        assert_eq!(config.cache.ttl_secs, 86_400);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
