use std::fmt;

use thiserror::Error;

use crate::llm_client::DEFAULT_MODEL;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SEARCH_RESULT_LIMIT: u32 = 10;
const MAX_SEARCH_RESULT_LIMIT: u32 = 100;
const DEFAULT_MAX_PAGE_CHARS: usize = 24_000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable '{key}' is not set")]
    Missing { key: &'static str },

    #[error("Environment variable '{key}' has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
/// Missing API keys are fatal at startup.
#[derive(Clone)]
pub struct Config {
    pub serper_api_key: String,
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub search_result_limit: u32,
    pub max_page_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is this over
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let search_result_limit = parse_or(&lookup, "SEARCH_RESULT_LIMIT", DEFAULT_SEARCH_RESULT_LIMIT)?;
        if search_result_limit == 0 || search_result_limit > MAX_SEARCH_RESULT_LIMIT {
            return Err(ConfigError::Invalid {
                key: "SEARCH_RESULT_LIMIT",
                value: search_result_limit.to_string(),
                reason: format!("must be between 1 and {MAX_SEARCH_RESULT_LIMIT}"),
            });
        }

        let max_page_chars = parse_or(&lookup, "MAX_PAGE_CHARS", DEFAULT_MAX_PAGE_CHARS)?;
        if max_page_chars == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_PAGE_CHARS",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Config {
            serper_api_key: require(&lookup, "SERPER_API_KEY")?,
            anthropic_api_key: require(&lookup, "ANTHROPIC_API_KEY")?,
            llm_model: optional(&lookup, "LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            search_result_limit,
            max_page_chars,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: optional(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

// API keys stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("serper_api_key", &"<redacted>")
            .field("anthropic_api_key", &"<redacted>")
            .field("llm_model", &self.llm_model)
            .field("search_result_limit", &self.search_result_limit)
            .field("max_page_chars", &self.max_page_chars)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing { key })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match optional(lookup, key) {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
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

    const KEYS: [(&str, &str); 2] = [
        ("SERPER_API_KEY", "serper-secret"),
        ("ANTHROPIC_API_KEY", "anthropic-secret"),
    ];

    #[test]
    fn test_defaults_applied_when_only_keys_set() {
        let config = Config::from_lookup(lookup_from(&KEYS)).unwrap();
        assert_eq!(config.serper_api_key, "serper-secret");
        assert_eq!(config.anthropic_api_key, "anthropic-secret");
        assert_eq!(config.llm_model, DEFAULT_MODEL);
        assert_eq!(config.search_result_limit, 10);
        assert_eq!(config.max_page_chars, 24_000);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_search_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "k")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { key: "SERPER_API_KEY" });
    }

    #[test]
    fn test_blank_model_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("SERPER_API_KEY", "k"),
            ("ANTHROPIC_API_KEY", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing { key: "ANTHROPIC_API_KEY" });
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn test_search_limit_out_of_range_rejected() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("SEARCH_RESULT_LIMIT", "0"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SEARCH_RESULT_LIMIT", .. }));
    }

    #[test]
    fn test_overrides_are_read() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("LLM_MODEL", "claude-haiku-4-5"),
            ("SEARCH_RESULT_LIMIT", "5"),
            ("MAX_PAGE_CHARS", "9000"),
            ("PORT", "3000"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.llm_model, "claude-haiku-4-5");
        assert_eq!(config.search_result_limit, 5);
        assert_eq!(config.max_page_chars, 9000);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = Config::from_lookup(lookup_from(&KEYS)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("serper-secret"));
        assert!(!rendered.contains("anthropic-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
