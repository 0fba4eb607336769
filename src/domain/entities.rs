use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// An uploaded document after text extraction. Immutable once created;
/// re-uploading the same file produces a new record.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub owner_sub: String,
    pub filename: String,
    pub content_type: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner_sub: String,
    pub filename: String,
    pub content_type: String,
    pub text: String,
}

/// One embedded slice of a document, ready for batch insert.
///
/// `owner_sub` is denormalized from the parent document so owner-scoped
/// retrieval never needs to consult the documents table first. `idx` is
/// contiguous from 0 within a document.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub document_id: Uuid,
    pub owner_sub: String,
    pub idx: i32,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A stored chunk joined to its parent document, as returned by the
/// owner-scoped retrieval query. Carries everything the similarity search
/// and citation assembly need in one row.
#[derive(Debug, Clone)]
pub struct ChunkWithDocument {
    pub chunk_id: Uuid,
    pub document_id: Uuid,
    pub filename: String,
    pub idx: i32,
    pub text: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub owner_sub: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
