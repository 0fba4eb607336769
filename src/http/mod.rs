pub mod dto;
pub mod handlers;
pub mod server;

use std::sync::Arc;

use crate::config::Settings;
use crate::db;
use crate::db::memory::MemoryStore;
use crate::db::postgres::{
    PostgresChatRepository, PostgresChunkRepository, PostgresDocumentRepository,
};
use crate::domain::repositories::{ChatRepository, ChunkRepository, DocumentRepository};
use crate::pipeline::IngestionPipeline;
use crate::progress::ProgressBroadcaster;
use crate::providers;
use crate::rag::answer::AnswerComposer;

/// Everything the handlers need, wired once at startup.
pub struct AppState {
    pub settings: Settings,
    pub documents: Arc<dyn DocumentRepository>,
    pub chunks: Arc<dyn ChunkRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub progress: ProgressBroadcaster,
    pub pipeline: Arc<IngestionPipeline>,
    pub composer: AnswerComposer,
}

impl AppState {
    /// Wire repositories, providers, pipeline and composer from settings.
    ///
    /// With `DATABASE_URL` set this connects a Postgres pool and runs the
    /// embedded migrations; without it everything lives in memory. Providers
    /// are remote when `OPENAI_API_KEY` is set, deterministic offline
    /// otherwise.
    pub fn from_settings(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let (documents, chunks, chats): (
            Arc<dyn DocumentRepository>,
            Arc<dyn ChunkRepository>,
            Arc<dyn ChatRepository>,
        ) = match &settings.database_url {
            Some(url) => {
                let pool = db::create_connection_pool(url)?;
                db::run_migrations(&pool)?;
                let documents: Arc<dyn DocumentRepository> =
                    Arc::new(PostgresDocumentRepository::new(pool.clone()));
                let chunks: Arc<dyn ChunkRepository> =
                    Arc::new(PostgresChunkRepository::new(pool.clone()));
                let chats: Arc<dyn ChatRepository> = Arc::new(PostgresChatRepository::new(pool));
                (documents, chunks, chats)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                let store = Arc::new(MemoryStore::new());
                let documents: Arc<dyn DocumentRepository> = store.clone();
                let chunks: Arc<dyn ChunkRepository> = store.clone();
                let chats: Arc<dyn ChatRepository> = store;
                (documents, chunks, chats)
            }
        };

        let (embedder, generator) = providers::from_settings(&settings)?;
        if settings.openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, using deterministic offline providers");
        }

        let progress = ProgressBroadcaster::new();
        let pipeline = Arc::new(IngestionPipeline::new(
            documents.clone(),
            chunks.clone(),
            embedder.clone(),
            progress.clone(),
            &settings,
        ));
        let composer = AnswerComposer::new(chunks.clone(), embedder, generator);

        Ok(Self {
            settings,
            documents,
            chunks,
            chats,
            progress,
            pipeline,
            composer,
        })
    }
}
