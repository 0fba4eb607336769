//! Grounded answer composition.
//!
//! Embeds the question, retrieves the owner's closest chunks, builds a
//! citation-marked prompt and delegates generation. The returned citations
//! map the `[Doc i]` markers back to source documents and scores.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::repositories::{ChunkRepository, RepositoryError};
use crate::providers::{EmbeddingProvider, ProviderError, TextGenerator};
use crate::rag::search::{SearchHit, search};

#[derive(Debug)]
pub enum AnswerError {
    Provider(ProviderError),
    Repository(RepositoryError),
}

impl std::fmt::Display for AnswerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerError::Provider(e) => write!(f, "Provider error: {}", e),
            AnswerError::Repository(e) => write!(f, "Repository error: {}", e),
        }
    }
}

impl std::error::Error for AnswerError {}

impl From<ProviderError> for AnswerError {
    fn from(e: ProviderError) -> Self {
        AnswerError::Provider(e)
    }
}

impl From<RepositoryError> for AnswerError {
    fn from(e: RepositoryError) -> Self {
        AnswerError::Repository(e)
    }
}

/// A verifiable pointer from an inline `[Doc i]` marker back to its source.
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    pub index: usize,
    pub document_id: Uuid,
    pub filename: String,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct ComposedAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
}

pub struct AnswerComposer {
    chunks: Arc<dyn ChunkRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn TextGenerator>,
}

impl AnswerComposer {
    pub fn new(
        chunks: Arc<dyn ChunkRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            chunks,
            embedder,
            generator,
        }
    }

    pub async fn answer(
        &self,
        owner_sub: &str,
        question: &str,
        top_k: usize,
    ) -> Result<ComposedAnswer, AnswerError> {
        let question_batch = [question.to_string()];
        let query = self
            .embedder
            .embed(&question_batch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AnswerError::Provider(ProviderError::ApiError(
                    "no embedding returned for question".to_string(),
                ))
            })?;

        let hits = search(&self.chunks, owner_sub, &query, top_k).await?;

        let citations: Vec<Citation> = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| Citation {
                index: i + 1,
                document_id: hit.chunk.document_id,
                filename: hit.chunk.filename.clone(),
                score: round4(hit.score),
            })
            .collect();

        let prompt = build_prompt(question, &hits);
        let answer = self.generator.generate(&prompt).await?;

        Ok(ComposedAnswer { answer, citations })
    }
}

/// Assemble the generation prompt: instruction, `[Doc i]`-marked context
/// blocks, then the question. Marker indices are 1-based and line up with
/// the returned citation list.
fn build_prompt(question: &str, hits: &[SearchHit]) -> String {
    let context_blocks: Vec<String> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| format!("[Doc {}] {}", i + 1, hit.chunk.text))
        .collect();

    format!(
        "Answer the question using only the context. Cite sources using [Doc i].\n\n{}\n\nQuestion: {}\nAnswer:",
        context_blocks.join("\n\n"),
        question
    )
}

fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}
