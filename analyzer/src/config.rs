//! Startup configuration.

use domain::ApiKey;
use thiserror::Error;
use video_client::DEFAULT_BASE_URL;

pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
pub const BASE_URL_VAR: &str = "YOUTUBE_API_BASE_URL";
pub const CLEAR_SCREEN_VAR: &str = "ANALYZER_CLEAR_SCREEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YOUTUBE_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_key: ApiKey,
    /// Data API root, overridable to target a stub service
    pub api_base_url: String,
    /// Clear the terminal before each menu
    pub clear_screen: bool,
}

impl AnalyzerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(ApiKey::new)
            .filter(|key| !key.is_placeholder())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let clear_screen = lookup(CLEAR_SCREEN_VAR)
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            api_key,
            api_base_url,
            clear_screen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AnalyzerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AnalyzerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[(API_KEY_VAR, "AIza-real")]).unwrap();
        assert_eq!(config.api_key.expose(), "AIza-real");
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert!(config.clear_screen);
    }

    #[test]
    fn test_missing_or_placeholder_key() {
        assert!(matches!(config(&[]), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            config(&[(API_KEY_VAR, "YOUR_API_KEY")]),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(config(&[(API_KEY_VAR, "")]), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (API_KEY_VAR, "k"),
            (BASE_URL_VAR, " http://127.0.0.1:8080/youtube/v3 "),
            (CLEAR_SCREEN_VAR, "false"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/youtube/v3");
        assert!(!config.clear_screen);
    }

    #[test]
    fn test_key_is_not_printed_in_debug() {
        let config = config(&[(API_KEY_VAR, "AIza-very-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
