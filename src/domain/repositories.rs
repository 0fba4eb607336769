use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{ChatMessage, ChatSession, ChunkWithDocument, Document, NewChunk, NewDocument};

#[derive(Debug)]
pub enum RepositoryError {
    DatabaseError(String),
    NotFound(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            RepositoryError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: NewDocument) -> Result<Document, RepositoryError>;

    /// All documents owned by `owner_sub`, most recent first.
    async fn list_by_owner(&self, owner_sub: &str) -> Result<Vec<Document>, RepositoryError>;
}

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    /// Insert all chunks of one document in a single batch. Atomic at the
    /// call granularity: either every chunk lands or the caller sees an error.
    async fn create_batch(&self, chunks: Vec<NewChunk>) -> Result<usize, RepositoryError>;

    /// Every chunk owned by `owner_sub`, joined to its document, in document
    /// insertion order then chunk index. This ordering is what makes
    /// similarity tie-breaks deterministic.
    async fn list_by_owner(
        &self,
        owner_sub: &str,
    ) -> Result<Vec<ChunkWithDocument>, RepositoryError>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn create_session(
        &self,
        owner_sub: &str,
        title: &str,
    ) -> Result<ChatSession, RepositoryError>;

    async fn find_session(
        &self,
        owner_sub: &str,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError>;

    async fn append_message(
        &self,
        session_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError>;
}
