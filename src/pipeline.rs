//! Background ingestion pipeline.
//!
//! Extraction, chunking, embedding and persistence for one uploaded file,
//! with a progress event published at each stage boundary. Each upload runs
//! as its own spawned task; pipelines share nothing but the chunk store.

use std::sync::Arc;

use crate::chunker::chunk_words;
use crate::config::Settings;
use crate::domain::entities::{NewChunk, NewDocument};
use crate::domain::repositories::{ChunkRepository, DocumentRepository, RepositoryError};
use crate::extract::extract_text;
use crate::progress::{ProgressBroadcaster, ProgressEvent, Stage};
use crate::providers::{EmbeddingProvider, ProviderError};

#[derive(Debug)]
pub enum PipelineError {
    Repository(RepositoryError),
    Provider(ProviderError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Repository(e) => write!(f, "Repository error: {}", e),
            PipelineError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<RepositoryError> for PipelineError {
    fn from(e: RepositoryError) -> Self {
        PipelineError::Repository(e)
    }
}

impl From<ProviderError> for PipelineError {
    fn from(e: ProviderError) -> Self {
        PipelineError::Provider(e)
    }
}

pub struct IngestionPipeline {
    documents: Arc<dyn DocumentRepository>,
    chunks: Arc<dyn ChunkRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    progress: ProgressBroadcaster,
    max_chunk_words: usize,
    chunk_overlap_words: usize,
}

impl IngestionPipeline {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        chunks: Arc<dyn ChunkRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        progress: ProgressBroadcaster,
        settings: &Settings,
    ) -> Self {
        Self {
            documents,
            chunks,
            embedder,
            progress,
            max_chunk_words: settings.max_chunk_words,
            chunk_overlap_words: settings.chunk_overlap_words,
        }
    }

    /// Fire-and-forget ingestion of one file. The caller has already been
    /// acknowledged; a failure here is logged but never surfaces to them,
    /// which a subscriber observes as a progress stream that stops before
    /// `done`.
    pub fn spawn(
        self: &Arc<Self>,
        owner_sub: String,
        filename: String,
        content: Vec<u8>,
        content_type: String,
    ) {
        let pipeline = self.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline
                .run(&owner_sub, &filename, &content, &content_type)
                .await
            {
                tracing::error!(%owner_sub, %filename, error = %e, "ingestion failed");
            }
        });
    }

    /// Run the full pipeline for one file: extract, persist the document,
    /// chunk, embed, batch-insert the chunks. Stages are strictly sequential
    /// and each boundary publishes a progress event before the next stage
    /// starts.
    pub async fn run(
        &self,
        owner_sub: &str,
        filename: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), PipelineError> {
        self.progress
            .publish(owner_sub, ProgressEvent::new(Stage::Received, filename));

        let text = extract_text(filename, content, content_type);
        let document = self
            .documents
            .create(NewDocument {
                owner_sub: owner_sub.to_string(),
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                text: text.clone(),
            })
            .await?;

        self.progress
            .publish(owner_sub, ProgressEvent::new(Stage::Chunking, filename));

        let pieces = chunk_words(&text, self.max_chunk_words, self.chunk_overlap_words);

        self.progress.publish(
            owner_sub,
            ProgressEvent::with_chunks(Stage::Embedding, filename, pieces.len()),
        );

        let vectors = self.embedder.embed(&pieces).await?;

        let new_chunks: Vec<NewChunk> = pieces
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(idx, (text, embedding))| NewChunk {
                document_id: document.id,
                owner_sub: owner_sub.to_string(),
                idx: idx as i32,
                text,
                embedding,
            })
            .collect();

        let inserted = self.chunks.create_batch(new_chunks).await?;

        tracing::info!(
            %owner_sub,
            %filename,
            document_id = %document.id,
            chunks = inserted,
            "ingestion complete"
        );

        self.progress.publish(
            owner_sub,
            ProgressEvent::with_chunks(Stage::Done, filename, inserted),
        );

        Ok(())
    }
}
