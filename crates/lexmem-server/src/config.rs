//! Server Configuration
//!
//! Environment-driven, with CLI flags applied on top (see `main.rs`).

use std::path::PathBuf;

/// Runtime configuration for the server binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub addr: String,
    /// Database directory override; `None` uses the platform data dir
    pub data_dir: Option<PathBuf>,
    /// Explanation generator settings; `None` disables generation
    pub ai: Option<AiConfig>,
}

/// Settings for the OpenAI-compatible explanation endpoint.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Bearer token
    pub api_key: String,
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Model name
    pub model: String,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let ai = std::env::var("LEXMEM_AI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|api_key| AiConfig {
                api_key,
                base_url: env_or("LEXMEM_AI_BASE_URL", "https://api.openai.com/v1"),
                model: env_or("LEXMEM_AI_MODEL", "gpt-4o-mini"),
            });

        Self {
            addr: env_or("LEXMEM_ADDR", "127.0.0.1:8080"),
            data_dir: std::env::var("LEXMEM_DATA_DIR").ok().map(PathBuf::from),
            ai,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
