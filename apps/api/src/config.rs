use anyhow::{Context, Result};

const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup fails if the primary API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub genai_api_key: String,
    /// Fallback credential used once when the primary key hits its quota.
    pub genai_api_key_secondary: Option<String>,
    pub genai_base_url: String,
    pub prompt_templates_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            genai_api_key: get("GENAI_API_KEY")
                .context("API key not found. Please set GENAI_API_KEY.")?,
            genai_api_key_secondary: get("GENAI_API_KEY_SECONDARY"),
            genai_base_url: get("GENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GENAI_BASE_URL.to_string()),
            prompt_templates_path: get("PROMPT_TEMPLATES_PATH"),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_primary_key_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("GENAI_API_KEY"));
    }

    #[test]
    fn test_blank_primary_key_fails() {
        assert!(Config::from_lookup(lookup_from(&[("GENAI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("GENAI_API_KEY", "primary")])).unwrap();
        assert_eq!(config.genai_api_key, "primary");
        assert!(config.genai_api_key_secondary.is_none());
        assert_eq!(config.genai_base_url, DEFAULT_GENAI_BASE_URL);
        assert!(config.prompt_templates_path.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_secondary_key_and_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GENAI_API_KEY", "primary"),
            ("GENAI_API_KEY_SECONDARY", "backup"),
            ("PORT", "9090"),
            ("GENAI_BASE_URL", "http://localhost:1234"),
        ]))
        .unwrap();
        assert_eq!(config.genai_api_key_secondary.as_deref(), Some("backup"));
        assert_eq!(config.port, 9090);
        assert_eq!(config.genai_base_url, "http://localhost:1234");
    }

    #[test]
    fn test_blank_secondary_key_is_absent() {
        let config = Config::from_lookup(lookup_from(&[
            ("GENAI_API_KEY", "primary"),
            ("GENAI_API_KEY_SECONDARY", ""),
        ]))
        .unwrap();
        assert!(config.genai_api_key_secondary.is_none());
    }

    #[test]
    fn test_invalid_port_fails() {
        let result = Config::from_lookup(lookup_from(&[
            ("GENAI_API_KEY", "primary"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
