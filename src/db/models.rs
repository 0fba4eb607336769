use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use super::schema::{chat_messages, chat_sessions, chunks, documents};
use crate::domain::entities::{ChatMessage, ChatSession, Document, NewChunk, NewDocument};

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub owner_sub: String,
    pub filename: String,
    pub content_type: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentModel> for Document {
    fn from(m: DocumentModel) -> Self {
        Document {
            id: m.id,
            owner_sub: m.owner_sub,
            filename: m.filename,
            content_type: m.content_type,
            text: m.text,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub owner_sub: String,
    pub filename: String,
    pub content_type: String,
    pub text: String,
}

impl From<NewDocument> for NewDocumentModel {
    fn from(d: NewDocument) -> Self {
        NewDocumentModel {
            owner_sub: d.owner_sub,
            filename: d.filename,
            content_type: d.content_type,
            text: d.text,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChunkModel {
    pub document_id: Uuid,
    pub owner_sub: String,
    pub idx: i32,
    pub text: String,
    pub embedding: Vector,
}

impl From<NewChunk> for NewChunkModel {
    fn from(c: NewChunk) -> Self {
        NewChunkModel {
            document_id: c.document_id,
            owner_sub: c.owner_sub,
            idx: c.idx,
            text: c.text,
            embedding: Vector::from(c.embedding),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = chat_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatSessionModel {
    pub id: Uuid,
    pub owner_sub: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatSessionModel> for ChatSession {
    fn from(m: ChatSessionModel) -> Self {
        ChatSession {
            id: m.id,
            owner_sub: m.owner_sub,
            title: m.title,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatSessionModel {
    pub owner_sub: String,
    pub title: String,
}

#[derive(Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessageModel {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessageModel> for ChatMessage {
    fn from(m: ChatMessageModel) -> Self {
        ChatMessage {
            id: m.id,
            session_id: m.session_id,
            role: m.role,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatMessageModel {
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
}
