//! In-memory store used when no `DATABASE_URL` is configured and by tests.
//!
//! Plain vectors behind `std::sync::RwLock`; retrieval order is insertion
//! order, matching the scan-order guarantee of the Postgres repositories.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{
    ChatMessage, ChatSession, ChunkWithDocument, Document, NewChunk, NewDocument,
};
use crate::domain::repositories::{
    ChatRepository, ChunkRepository, DocumentRepository, RepositoryError,
};

#[derive(Clone)]
struct StoredChunk {
    chunk_id: Uuid,
    document_id: Uuid,
    owner_sub: String,
    idx: i32,
    text: String,
    embedding: Vec<f32>,
}

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
    chunks: RwLock<Vec<StoredChunk>>,
    sessions: RwLock<Vec<ChatSession>>,
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn filename_of(&self, document_id: Uuid) -> String {
        self.documents
            .read()
            .expect("memory store lock poisoned")
            .iter()
            .find(|d| d.id == document_id)
            .map(|d| d.filename.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn create(&self, document: NewDocument) -> Result<Document, RepositoryError> {
        let created = Document {
            id: Uuid::new_v4(),
            owner_sub: document.owner_sub,
            filename: document.filename,
            content_type: document.content_type,
            text: document.text,
            created_at: Utc::now(),
        };

        self.documents
            .write()
            .expect("memory store lock poisoned")
            .push(created.clone());

        Ok(created)
    }

    async fn list_by_owner(&self, owner_sub: &str) -> Result<Vec<Document>, RepositoryError> {
        let documents = self.documents.read().expect("memory store lock poisoned");

        let mut owned: Vec<Document> = documents
            .iter()
            .filter(|d| d.owner_sub == owner_sub)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }
}

#[async_trait]
impl ChunkRepository for MemoryStore {
    async fn create_batch(&self, new_chunks: Vec<NewChunk>) -> Result<usize, RepositoryError> {
        let mut chunks = self.chunks.write().expect("memory store lock poisoned");

        let count = new_chunks.len();
        for chunk in new_chunks {
            chunks.push(StoredChunk {
                chunk_id: Uuid::new_v4(),
                document_id: chunk.document_id,
                owner_sub: chunk.owner_sub,
                idx: chunk.idx,
                text: chunk.text,
                embedding: chunk.embedding,
            });
        }

        Ok(count)
    }

    async fn list_by_owner(
        &self,
        owner_sub: &str,
    ) -> Result<Vec<ChunkWithDocument>, RepositoryError> {
        let chunks = self.chunks.read().expect("memory store lock poisoned");

        Ok(chunks
            .iter()
            .filter(|c| c.owner_sub == owner_sub)
            .map(|c| ChunkWithDocument {
                chunk_id: c.chunk_id,
                document_id: c.document_id,
                filename: self.filename_of(c.document_id),
                idx: c.idx,
                text: c.text.clone(),
                embedding: c.embedding.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn create_session(
        &self,
        owner_sub: &str,
        title: &str,
    ) -> Result<ChatSession, RepositoryError> {
        let session = ChatSession {
            id: Uuid::new_v4(),
            owner_sub: owner_sub.to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
        };

        self.sessions
            .write()
            .expect("memory store lock poisoned")
            .push(session.clone());

        Ok(session)
    }

    async fn find_session(
        &self,
        owner_sub: &str,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        let sessions = self.sessions.read().expect("memory store lock poisoned");

        Ok(sessions
            .iter()
            .find(|s| s.id == session_id && s.owner_sub == owner_sub)
            .cloned())
    }

    async fn append_message(
        &self,
        session_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let message = ChatMessage {
            id: Uuid::new_v4(),
            session_id,
            role: role.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };

        self.messages
            .write()
            .expect("memory store lock poisoned")
            .push(message.clone());

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn documents_list_most_recent_first() {
        let store = MemoryStore::new();

        for name in ["first.txt", "second.txt"] {
            store
                .create(NewDocument {
                    owner_sub: "alice".to_string(),
                    filename: name.to_string(),
                    content_type: "text/plain".to_string(),
                    text: String::new(),
                })
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let docs = DocumentRepository::list_by_owner(&store, "alice")
            .await
            .unwrap();
        assert_eq!(docs[0].filename, "second.txt");
        assert_eq!(docs[1].filename, "first.txt");
    }

    #[tokio::test]
    async fn chunk_join_carries_document_filename() {
        let store = MemoryStore::new();
        let doc = store
            .create(NewDocument {
                owner_sub: "alice".to_string(),
                filename: "notes.txt".to_string(),
                content_type: "text/plain".to_string(),
                text: String::new(),
            })
            .await
            .unwrap();

        store
            .create_batch(vec![NewChunk {
                document_id: doc.id,
                owner_sub: "alice".to_string(),
                idx: 0,
                text: "hello".to_string(),
                embedding: vec![1.0],
            }])
            .await
            .unwrap();

        let rows = ChunkRepository::list_by_owner(&store, "alice")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filename, "notes.txt");
        assert_eq!(rows[0].document_id, doc.id);
    }

    #[tokio::test]
    async fn sessions_are_owner_scoped() {
        let store = MemoryStore::new();
        let session = store.create_session("alice", "first chat").await.unwrap();

        assert!(
            store
                .find_session("alice", session.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(store.find_session("bob", session.id).await.unwrap().is_none());
    }
}
