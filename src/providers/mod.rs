//! Embedding and text-generation providers.
//!
//! Two interchangeable strategies sit behind each trait: a remote
//! OpenAI-compatible client, and deterministic offline stand-ins used when no
//! API key is configured. Callers depend only on the traits and never branch
//! on which mode is active.

pub mod offline;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;

#[derive(Debug)]
pub enum ProviderError {
    NetworkError(String),
    ApiError(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ProviderError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Maps texts to fixed-dimension vectors, one per input, same order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Produces an answer for a fully assembled prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Select providers from configuration: remote when an API key is present,
/// deterministic offline otherwise.
pub fn from_settings(
    settings: &Settings,
) -> Result<(Arc<dyn EmbeddingProvider>, Arc<dyn TextGenerator>), reqwest::Error> {
    match &settings.openai_api_key {
        Some(api_key) => {
            let client = Arc::new(openai::OpenAiClient::new(
                api_key.clone(),
                settings.openai_base_url.clone(),
                settings.embedding_model.clone(),
                settings.llm_model.clone(),
                settings.provider_timeout_secs,
            )?);
            let embedder: Arc<dyn EmbeddingProvider> = client.clone();
            let generator: Arc<dyn TextGenerator> = client;
            Ok((embedder, generator))
        }
        None => Ok((
            Arc::new(offline::HashEmbedder::new(settings.mock_embedding_dim)),
            Arc::new(offline::CannedGenerator),
        )),
    }
}
