//! Engine configuration read from the environment.
//!
//! Supported variables:
//! - `SERVER_PORT`: HTTP port (default 3000)
//! - `IMAGIND_DB_PATH`: SQLite event log path (default `./data/events.db`)
//! - `IMAGIND_WORLD_FILE`: JSON world seed; the demo world is used when unset
//! - `LLM_PROVIDER`: `ollama` (default) or `anthropic`
//! - `OLLAMA_BASE_URL`, `OLLAMA_MODEL`
//! - `ANTHROPIC_API_KEY`, `ANTHROPIC_MODEL`
//! - `AUTONOMOUS_TICK_INTERVAL_SECS`: background tick period, 0 disables it
//! - `EVENT_HISTORY_LIMIT`: recent events shown to autonomous actors (default 20)

use std::time::Duration;

use crate::infrastructure::anthropic::DEFAULT_ANTHROPIC_MODEL;
use crate::infrastructure::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "./data/events.db";
pub const DEFAULT_EVENT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProvider {
    Ollama {
        base_url: String,
        model: String,
    },
    Anthropic {
        api_key: String,
        model: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown LLM_PROVIDER '{0}', expected 'ollama' or 'anthropic'")]
    UnknownProvider(String),
    #[error("ANTHROPIC_API_KEY must be set when LLM_PROVIDER is 'anthropic'")]
    MissingApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_port: u16,
    pub db_path: String,
    pub world_file: Option<String>,
    pub llm: LlmProvider,
    /// `None` when the background tick is disabled
    pub tick_interval: Option<Duration>,
    pub event_history_limit: usize,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = get("LLM_PROVIDER").unwrap_or_else(|| "ollama".to_string());
        let llm = match provider.to_lowercase().as_str() {
            "ollama" => LlmProvider::Ollama {
                base_url: get("OLLAMA_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
                model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            },
            "anthropic" => LlmProvider::Anthropic {
                api_key: get("ANTHROPIC_API_KEY").ok_or(ConfigError::MissingApiKey)?,
                model: get("ANTHROPIC_MODEL")
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            },
            _ => return Err(ConfigError::UnknownProvider(provider)),
        };

        let tick_secs: u64 = parse_or_default(
            "AUTONOMOUS_TICK_INTERVAL_SECS",
            get("AUTONOMOUS_TICK_INTERVAL_SECS"),
            0,
        );

        Ok(Self {
            server_port: parse_or_default("SERVER_PORT", get("SERVER_PORT"), DEFAULT_SERVER_PORT),
            db_path: get("IMAGIND_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            world_file: get("IMAGIND_WORLD_FILE"),
            llm,
            tick_interval: (tick_secs > 0).then(|| Duration::from_secs(tick_secs)),
            event_history_limit: parse_or_default(
                "EVENT_HISTORY_LIMIT",
                get("EVENT_HISTORY_LIMIT"),
                DEFAULT_EVENT_HISTORY_LIMIT,
            ),
        })
    }
}

fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match value {
        None => default,
        Some(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    key,
                    val = %val,
                    default = %default,
                    "Invalid numeric configuration value, using default"
                );
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<EngineConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.db_path, "./data/events.db");
        assert_eq!(config.world_file, None);
        assert_eq!(config.tick_interval, None);
        assert_eq!(config.event_history_limit, 20);
        assert_eq!(
            config.llm,
            LlmProvider::Ollama {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.2".to_string(),
            }
        );
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config(&[
            ("SERVER_PORT", "not-a-port"),
            ("EVENT_HISTORY_LIMIT", "-4"),
            ("AUTONOMOUS_TICK_INTERVAL_SECS", "15"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.event_history_limit, 20);
        assert_eq!(config.tick_interval, Some(Duration::from_secs(15)));
    }

    #[test]
    fn anthropic_requires_a_key() {
        assert!(matches!(
            config(&[("LLM_PROVIDER", "anthropic")]),
            Err(ConfigError::MissingApiKey)
        ));

        let config = config(&[("LLM_PROVIDER", "Anthropic"), ("ANTHROPIC_API_KEY", "k")]).unwrap();
        assert_eq!(
            config.llm,
            LlmProvider::Anthropic {
                api_key: "k".to_string(),
                model: "claude-3-5-sonnet-latest".to_string(),
            }
        );
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(matches!(
            config(&[("LLM_PROVIDER", "gpt")]),
            Err(ConfigError::UnknownProvider(p)) if p == "gpt"
        ));
    }
}
