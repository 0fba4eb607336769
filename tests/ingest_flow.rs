//! End-to-end ingestion and retrieval over the in-memory store with the
//! deterministic offline providers.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use docuchat::config::Settings;
use docuchat::db::memory::MemoryStore;
use docuchat::domain::repositories::{ChunkRepository, DocumentRepository};
use docuchat::pipeline::IngestionPipeline;
use docuchat::progress::{ProgressBroadcaster, Stage};
use docuchat::providers::offline::{ANSWER_PLACEHOLDER, CannedGenerator, HashEmbedder};
use docuchat::providers::{EmbeddingProvider, ProviderError};
use docuchat::rag::answer::AnswerComposer;
use docuchat::rag::search::search;

/// Wraps the hash embedder and records every batch it is asked to embed.
struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
}

impl CountingEmbedder {
    fn new(dim: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dim),
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(texts.len());
        self.inner.embed(texts).await
    }
}

fn test_settings() -> Settings {
    Settings {
        max_chunk_words: 600,
        chunk_overlap_words: 80,
        mock_embedding_dim: 64,
        ..Settings::default()
    }
}

fn twelve_hundred_words() -> String {
    (0..1200)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::test]
async fn pipeline_emits_stages_in_order_and_persists_chunks() {
    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(64));
    let progress = ProgressBroadcaster::new();

    let pipeline = IngestionPipeline::new(
        store.clone(),
        store.clone(),
        embedder.clone(),
        progress.clone(),
        &test_settings(),
    );

    let mut rx = progress.subscribe("alice");
    let body = twelve_hundred_words();

    pipeline
        .run("alice", "big.txt", body.as_bytes(), "text/plain")
        .await
        .unwrap();

    let stages: Vec<_> = (0..4).map(|_| rx.try_recv().unwrap()).collect();
    assert_eq!(
        stages.iter().map(|e| e.stage).collect::<Vec<_>>(),
        vec![Stage::Received, Stage::Chunking, Stage::Embedding, Stage::Done]
    );
    assert!(stages.iter().all(|e| e.filename == "big.txt"));
    // no fifth event, terminal or otherwise
    assert!(rx.try_recv().is_err());

    // 1200 words, window 600, overlap 80: starts at 0, 520, 1040
    assert_eq!(stages[2].chunks, Some(3));
    assert_eq!(stages[3].chunks, Some(3));

    // one embedding call covering the whole document
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*embedder.batch_sizes.lock().unwrap(), vec![3]);

    let chunk_repo: Arc<dyn ChunkRepository> = store.clone();
    let persisted = chunk_repo.list_by_owner("alice").await.unwrap();
    assert_eq!(persisted.len(), 3);
    assert_eq!(
        persisted.iter().map(|c| c.idx).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(persisted.iter().all(|c| c.embedding.len() == 64));

    let doc_repo: Arc<dyn DocumentRepository> = store.clone();
    let documents = doc_repo.list_by_owner("alice").await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].filename, "big.txt");
}

#[tokio::test]
async fn question_matching_a_chunk_cites_it_first() {
    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(HashEmbedder::new(64));
    let progress = ProgressBroadcaster::new();

    let pipeline = IngestionPipeline::new(
        store.clone(),
        store.clone(),
        embedder.clone(),
        progress,
        &test_settings(),
    );

    let body = twelve_hundred_words();
    pipeline
        .run("alice", "big.txt", body.as_bytes(), "text/plain")
        .await
        .unwrap();

    let chunk_repo: Arc<dyn ChunkRepository> = store.clone();
    let persisted = chunk_repo.list_by_owner("alice").await.unwrap();
    let third_chunk_text = persisted[2].text.clone();

    // deterministic embeddings: an identical question scores 1.0 on chunk 3
    let hits = {
        let question_vec = embedder
            .embed(&[third_chunk_text.clone()])
            .await
            .unwrap()
            .remove(0);
        search(&chunk_repo, "alice", &question_vec, 5).await.unwrap()
    };
    assert_eq!(hits[0].chunk.idx, 2);
    assert!((hits[0].score - 1.0).abs() < 1e-5);

    let composer = AnswerComposer::new(
        chunk_repo.clone(),
        embedder.clone(),
        Arc::new(CannedGenerator),
    );
    let composed = composer
        .answer("alice", &third_chunk_text, 5)
        .await
        .unwrap();

    assert_eq!(composed.answer, ANSWER_PLACEHOLDER);
    assert_eq!(composed.citations.len(), 3);
    assert_eq!(composed.citations[0].index, 1);
    assert_eq!(composed.citations[0].filename, "big.txt");
    assert!(composed.citations[0].score > composed.citations[1].score);
    assert!((composed.citations[0].score - 1.0).abs() < 1e-3);
}

#[tokio::test]
async fn concurrent_ingestions_do_not_interfere() {
    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(HashEmbedder::new(32));
    let progress = ProgressBroadcaster::new();

    let pipeline = Arc::new(IngestionPipeline::new(
        store.clone(),
        store.clone(),
        embedder,
        progress,
        &test_settings(),
    ));

    let mut handles = Vec::new();
    for (owner, name) in [("alice", "a.txt"), ("alice", "b.txt"), ("bob", "c.txt")] {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            pipeline
                .run(owner, name, b"some shared words here", "text/plain")
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let doc_repo: Arc<dyn DocumentRepository> = store.clone();
    assert_eq!(doc_repo.list_by_owner("alice").await.unwrap().len(), 2);
    assert_eq!(doc_repo.list_by_owner("bob").await.unwrap().len(), 1);

    let chunk_repo: Arc<dyn ChunkRepository> = store.clone();
    assert_eq!(chunk_repo.list_by_owner("bob").await.unwrap().len(), 1);
}
