use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::constants::{
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_HOST_ID, DEFAULT_PORT, DETAIL_CACHE_TTL_MS,
    LIST_CACHE_TTL_MS, UNIVERSE_GRAPHQL_URL, UNIVERSE_TOKEN_URL,
};
use crate::error::{GatewayError, Result};

pub const CONFIG_PATH_ENV: &str = "EVENT_GATEWAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub token_url: String,
    pub graphql_url: String,
    /// Request timeout; the HTTP client default applies when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            token_url: UNIVERSE_TOKEN_URL.to_string(),
            graphql_url: UNIVERSE_GRAPHQL_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub list_ttl_ms: i64,
    pub detail_ttl_ms: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl_ms: LIST_CACHE_TTL_MS,
            detail_ttl_ms: DETAIL_CACHE_TTL_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub default_host_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_host_id: DEFAULT_HOST_ID.to_string(),
        }
    }
}

/// OAuth client-credentials pair, read only from the environment
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl ClientCredentials {
    /// Read the credential pair; `None` when either half is missing or empty.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var(CLIENT_ID_ENV).ok().filter(|s| !s.is_empty());
        let client_secret = std::env::var(CLIENT_SECRET_ENV).ok().filter(|s| !s.is_empty());
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(Self {
                client_id,
                client_secret,
            }),
            _ => {
                warn!(
                    "{} / {} not set; token exchange will fail",
                    CLIENT_ID_ENV, CLIENT_SECRET_ENV
                );
                None
            }
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, `EVENT_GATEWAY_CONFIG`, or
    /// `config.toml`. Only the implicit default path may be absent.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let (config_path, required) = match explicit_path.or(env_path.as_deref()) {
            Some(path) => (path.to_string(), true),
            None => (DEFAULT_CONFIG_PATH.to_string(), false),
        };

        let mut config = if !required && !Path::new(&config_path).exists() {
            info!("No config file at '{}', using defaults", config_path);
            Config::default()
        } else {
            Self::from_file(&config_path)?
        };

        if let Some(port) = std::env::var("PORT").ok().and_then(|s| s.parse().ok()) {
            config.server.port = port;
        }

        Ok(config)
    }

    pub fn from_file(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            GatewayError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cache.list_ttl_ms < 0 || self.cache.detail_ttl_ms < 0 {
            return Err(GatewayError::Config(
                "cache TTLs must not be negative".to_string(),
            ));
        }
        if self.server.default_host_id.trim().is_empty() {
            return Err(GatewayError::Config(
                "server.default_host_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.list_ttl_ms, 60_000);
        assert_eq!(config.cache.detail_ttl_ms, 300_000);
        assert_eq!(config.server.default_host_id, DEFAULT_HOST_ID);
        assert_eq!(config.upstream.graphql_url, UNIVERSE_GRAPHQL_URL);
        assert!(config.upstream.timeout_seconds.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[cache]\nlist_ttl_ms = 1000\n\n[upstream]\ntimeout_seconds = 10"
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.cache.list_ttl_ms, 1000);
        assert_eq!(config.cache.detail_ttl_ms, 300_000);
        assert_eq!(config.upstream.timeout_seconds, Some(10));
        assert_eq!(config.upstream.token_url, UNIVERSE_TOKEN_URL);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = Config::load(Some("/definitely/not/here.toml"));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\ndetail_ttl_ms = -5").unwrap();

        let result = Config::from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[cache\nlist_ttl_ms = ").unwrap();

        let result = Config::from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(GatewayError::Toml(_))));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = ClientCredentials {
            client_id: "id".into(),
            client_secret: "hunter2".into(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("id"));
    }
}
