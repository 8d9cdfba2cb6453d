//! Configuration management for the chat server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::chat::GenerationModel;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base directory for uploaded documents. Each session gets its own
    /// subdirectory underneath; the whole tree is removed on shutdown.
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// API key for the hosted generation endpoint. Absent key means the
    /// generator degrades to a fixed message instead of calling out.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: GenerationModel,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on document characters embedded in a prompt.
    pub max_context_chars: usize,
    /// Request timeout for one generation call, in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                base_dir: PathBuf::from("temp"),
            },
            generation: GenerationConfig {
                api_key: None,
                api_url: "https://api.cohere.ai/v1/generate".to_string(),
                model: GenerationModel::Command,
                temperature: 0.2,
                max_tokens: 300,
                max_context_chars: 4000,
                timeout_secs: 30,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                base_dir: env::var("STORAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.base_dir),
            },
            generation: GenerationConfig {
                api_key: env::var("COHERE_API_KEY").ok().filter(|k| !k.is_empty()),
                api_url: env::var("COHERE_API_URL").unwrap_or(defaults.generation.api_url),
                model: env::var("GENERATION_MODEL")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.generation.model),
                temperature: env::var("GENERATION_TEMPERATURE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|t| (0.0..=1.0).contains(t))
                    .unwrap_or(defaults.generation.temperature),
                max_tokens: env::var("GENERATION_MAX_TOKENS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.generation.max_tokens),
                max_context_chars: env::var("MAX_CONTEXT_CHARS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.generation.max_context_chars),
                timeout_secs: env::var("GENERATION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.generation.timeout_secs),
            },
        }
    }
}
