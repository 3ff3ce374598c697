//! services/web/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Marker left in the generate-endpoint URL until a real host is configured.
pub const OLLAMA_URL_PLACEHOLDER: &str = "[YOUR_OLLAMA_CLOUD_HOST]";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub deepseek_api_key: Option<String>,
    pub deepseek_base_url: String,
    pub default_model: String,
    pub ollama_api_url: String,
    pub ollama_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub base_prompt_path: PathBuf,
    /// Sessions untouched for this long are dropped by the sweeper.
    pub session_idle_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        // Blank keys are treated as absent.
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // --- Server Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:5000");
        let mut bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;
        if let Some(port) = lookup("PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?;
            bind_address.set_port(port);
        }

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Generation Backends ---
        let deepseek_api_key = secret("DEEPSEEK_API_KEY");
        let deepseek_base_url = var_or("DEEPSEEK_BASE_URL", "https://api.deepseek.com/v1");
        let default_model = var_or("DEFAULT_LLM_MODEL", "deepseek-v3.2-chat");

        let ollama_api_url = var_or(
            "OLLAMA_CLOUD_API_URL",
            &format!("https://{}/api/generate", OLLAMA_URL_PLACEHOLDER),
        );
        let ollama_api_key = secret("OLLAMA_CLOUD_API_KEY");

        let gemini_api_key = secret("GEMINI_API_KEY");
        let gemini_base_url = var_or(
            "GEMINI_BASE_URL",
            "https://generativelanguage.googleapis.com/v1beta",
        );
        let gemini_model = var_or("GEMINI_MODEL", "gemini-2.5-flash");

        let base_prompt_path = lookup("BASE_PROMPT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("prompt.txt"));

        let ttl_str = var_or("SESSION_IDLE_TTL_SECS", "86400");
        let session_idle_ttl = ttl_str
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SESSION_IDLE_TTL_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", ttl_str),
                )
            })?;

        Ok(Self {
            bind_address,
            log_level,
            deepseek_api_key,
            deepseek_base_url,
            default_model,
            ollama_api_url,
            ollama_api_key,
            gemini_api_key,
            gemini_base_url,
            gemini_model,
            base_prompt_path,
            session_idle_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 5000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.default_model, "deepseek-v3.2-chat");
        assert!(config.ollama_api_url.contains(OLLAMA_URL_PLACEHOLDER));
        assert!(config.deepseek_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.base_prompt_path, PathBuf::from("prompt.txt"));
        assert_eq!(config.session_idle_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn session_ttl_must_be_positive() {
        let config = load(&[("SESSION_IDLE_TTL_SECS", "600")]).unwrap();
        assert_eq!(config.session_idle_ttl, Duration::from_secs(600));

        for bad in ["0", "-5", "soon"] {
            assert!(matches!(
                load(&[("SESSION_IDLE_TTL_SECS", bad)]),
                Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_IDLE_TTL_SECS"
            ));
        }
    }

    #[test]
    fn port_overrides_bind_address() {
        let config = load(&[("BIND_ADDRESS", "127.0.0.1:8080"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let config = load(&[("DEEPSEEK_API_KEY", "  "), ("GEMINI_API_KEY", "g-key")]).unwrap();
        assert!(config.deepseek_api_key.is_none());
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "PORT"
        ));
        assert!(matches!(
            load(&[("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"
        ));
        assert!(load(&[("BIND_ADDRESS", "nowhere")]).is_err());
    }
}
