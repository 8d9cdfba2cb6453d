//! Cohere generation API client
//!
//! One synchronous request per question to the hosted `/v1/generate`
//! endpoint. No streaming, no retry; the request timeout is enforced by
//! the underlying HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::generator::STOP_SEQUENCES;
use super::types::{GenerationError, GenerationModel};
use crate::config::GenerationConfig;

/// Backend for hosted answer generation
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Issue exactly one generation request for `prompt` and return the
    /// generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    k: u32,
    stop_sequences: &'a [&'a str],
    return_likelihoods: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

// ============================================================================
// Client
// ============================================================================

/// Cohere `/v1/generate` client
pub struct CohereClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: GenerationModel,
    temperature: f32,
    max_tokens: u32,
}

impl CohereClient {
    /// Build a client from configuration. Returns `None` when no API key
    /// is configured, so the generator degrades instead of calling out.
    pub fn from_config(config: &GenerationConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;

        Some(Self {
            http,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl GenerationBackend for CohereClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: self.model.as_str(),
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            k: 0,
            stop_sequences: &STOP_SEQUENCES,
            return_likelihoods: "NONE",
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let generation = parsed
            .generations
            .first()
            .ok_or_else(|| GenerationError::MalformedResponse("empty generations list".into()))?;

        Ok(generation.text.trim().to_string())
    }
}
