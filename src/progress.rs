//! Best-effort ingestion progress fan-out.
//!
//! One broadcast channel per owner. Publishing is fire-and-forget: if nobody
//! ever subscribed for that owner, or every receiver is gone, the event is
//! dropped. Progress is advisory UI feedback, not a correctness channel, so
//! there is no replay buffer and no delivery guarantee for late subscribers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Received,
    Chunking,
    Embedding,
    Done,
}

/// One stage-tagged notification for one ingestion. `chunks` is populated
/// from the embedding stage onward, once the count is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, filename: &str) -> Self {
        Self {
            stage,
            filename: filename.to_string(),
            chunks: None,
        }
    }

    pub fn with_chunks(stage: Stage, filename: &str, chunks: usize) -> Self {
        Self {
            stage,
            filename: filename.to_string(),
            chunks: Some(chunks),
        }
    }
}

#[derive(Clone, Default)]
pub struct ProgressBroadcaster {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<ProgressEvent>>>>,
}

impl ProgressBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every listener currently attached to the owner's
    /// channel. Never blocks and never fails.
    pub fn publish(&self, owner_sub: &str, event: ProgressEvent) {
        let channels = self.channels.read().expect("progress lock poisoned");
        if let Some(tx) = channels.get(owner_sub) {
            // send only errors when there are no receivers; that is fine here
            let _ = tx.send(event);
        }
    }

    /// Attach a live listener to the owner's channel, creating the channel on
    /// first use. Events published before this call are not replayed.
    pub fn subscribe(&self, owner_sub: &str) -> broadcast::Receiver<ProgressEvent> {
        let mut channels = self.channels.write().expect("progress lock poisoned");
        channels
            .entry(owner_sub.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}
