//! Postgres-backed repositories.
//!
//! Embeddings live in a pgvector column; similarity ranking itself happens in
//! application code, so the queries here are plain owner-scoped selects and
//! batch inserts.

use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use super::models::{
    ChatMessageModel, ChatSessionModel, DocumentModel, NewChatMessageModel, NewChatSessionModel,
    NewChunkModel, NewDocumentModel,
};
use super::schema::{chat_messages, chat_sessions, chunks, documents};
use super::{DbPool, get_connection_from_pool};
use crate::domain::entities::{
    ChatMessage, ChatSession, ChunkWithDocument, Document, NewChunk, NewDocument,
};
use crate::domain::repositories::{
    ChatRepository, ChunkRepository, DocumentRepository, RepositoryError,
};

fn db_err(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn create(&self, document: NewDocument) -> Result<Document, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let model: DocumentModel = diesel::insert_into(documents::table)
            .values(NewDocumentModel::from(document))
            .get_result(&mut conn)
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn list_by_owner(&self, owner_sub: &str) -> Result<Vec<Document>, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let models = documents::table
            .filter(documents::owner_sub.eq(owner_sub))
            .order(documents::created_at.desc())
            .load::<DocumentModel>(&mut conn)
            .map_err(db_err)?;

        Ok(models.into_iter().map(Document::from).collect())
    }
}

pub struct PostgresChunkRepository {
    pool: DbPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn create_batch(&self, new_chunks: Vec<NewChunk>) -> Result<usize, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let models: Vec<NewChunkModel> = new_chunks.into_iter().map(NewChunkModel::from).collect();

        diesel::insert_into(chunks::table)
            .values(&models)
            .execute(&mut conn)
            .map_err(db_err)
    }

    async fn list_by_owner(
        &self,
        owner_sub: &str,
    ) -> Result<Vec<ChunkWithDocument>, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let rows = chunks::table
            .inner_join(documents::table)
            .filter(chunks::owner_sub.eq(owner_sub))
            .order((documents::created_at.asc(), chunks::idx.asc()))
            .select((
                chunks::id,
                chunks::document_id,
                documents::filename,
                chunks::idx,
                chunks::text,
                chunks::embedding,
            ))
            .load::<(Uuid, Uuid, String, i32, String, Vector)>(&mut conn)
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(
                |(chunk_id, document_id, filename, idx, text, embedding)| ChunkWithDocument {
                    chunk_id,
                    document_id,
                    filename,
                    idx,
                    text,
                    embedding: embedding.to_vec(),
                },
            )
            .collect())
    }
}

pub struct PostgresChatRepository {
    pool: DbPool,
}

impl PostgresChatRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn create_session(
        &self,
        owner_sub: &str,
        title: &str,
    ) -> Result<ChatSession, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let model: ChatSessionModel = diesel::insert_into(chat_sessions::table)
            .values(NewChatSessionModel {
                owner_sub: owner_sub.to_string(),
                title: title.to_string(),
            })
            .get_result(&mut conn)
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn find_session(
        &self,
        owner_sub: &str,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let model = chat_sessions::table
            .find(session_id)
            .filter(chat_sessions::owner_sub.eq(owner_sub))
            .first::<ChatSessionModel>(&mut conn)
            .optional()
            .map_err(db_err)?;

        Ok(model.map(ChatSession::from))
    }

    async fn append_message(
        &self,
        session_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool).map_err(db_err)?;

        let model: ChatMessageModel = diesel::insert_into(chat_messages::table)
            .values(NewChatMessageModel {
                session_id,
                role: role.to_string(),
                content: content.to_string(),
            })
            .get_result(&mut conn)
            .map_err(db_err)?;

        Ok(model.into())
    }
}
