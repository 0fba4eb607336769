use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::rag::answer::Citation;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: Option<usize>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub session_id: Uuid,
}

/// Listing projection: never exposes extracted text or embeddings.
#[derive(Debug, Serialize)]
pub struct DocumentDto {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentDto {
    fn from(d: Document) -> Self {
        DocumentDto {
            id: d.id,
            filename: d.filename,
            content_type: d.content_type,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub sub: String,
}

#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    pub sub: Option<String>,
}
