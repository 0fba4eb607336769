use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use super::{EmbeddingProvider, ProviderError, TextGenerator};

pub const ANSWER_PLACEHOLDER: &str =
    "[MOCK ANSWER] This is a placeholder answer generated without external LLM.";

/// Deterministic pseudo-embedding provider for offline runs and tests.
///
/// The SHA-256 digest of the text seeds a PRNG that draws `dim` components
/// uniformly from [-1, 1). The same text always maps to the same vector;
/// reproducibility is the design goal here, not semantic quality.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed: [u8; 32] = Sha256::digest(text.as_bytes()).into();
        let mut rng = StdRng::from_seed(seed);
        (0..self.dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

/// Placeholder generator used when no LLM credential is configured.
pub struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(ANSWER_PLACEHOLDER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_yields_identical_vectors() {
        let embedder = HashEmbedder::new(256);
        let a = embedder.embed(&["hello world".to_string()]).await.unwrap();
        let b = embedder.embed(&["hello world".to_string()]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn vector_depends_only_on_its_own_text() {
        let embedder = HashEmbedder::new(64);
        let solo = embedder.embed(&["alpha".to_string()]).await.unwrap();
        let batch = embedder
            .embed(&["beta".to_string(), "alpha".to_string()])
            .await
            .unwrap();
        assert_eq!(solo[0], batch[1]);
    }

    #[tokio::test]
    async fn dimension_is_fixed_including_empty_string() {
        let embedder = HashEmbedder::new(256);
        let vectors = embedder
            .embed(&["".to_string(), "x".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 256);
        assert_eq!(vectors[1].len(), 256);
    }

    #[tokio::test]
    async fn components_stay_in_unit_range() {
        let embedder = HashEmbedder::new(256);
        let vectors = embedder.embed(&["range check".to_string()]).await.unwrap();
        assert!(vectors[0].iter().all(|c| (-1.0..1.0).contains(c)));
    }

    #[tokio::test]
    async fn different_texts_differ() {
        let embedder = HashEmbedder::new(256);
        let vectors = embedder
            .embed(&["one".to_string(), "two".to_string()])
            .await
            .unwrap();
        assert_ne!(vectors[0], vectors[1]);
    }
}
