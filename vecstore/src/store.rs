use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Metadata attached to an enrollment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Where the sample came from (e.g. "enroll-cli", "mobile-app").
    pub source: String,
    /// Original capture filename, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// When the reference embedding was stored.
    pub enrolled_at: DateTime<Utc>,
}

impl RecordMeta {
    pub fn now(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            file_name: None,
            enrolled_at: Utc::now(),
        }
    }

    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A single result from a similarity query.
#[derive(Debug, Clone)]
pub struct Match {
    /// Identifier of the matched enrollment record.
    pub user_id: String,

    /// Cosine similarity between query and record, in [-1, 1].
    /// Higher values indicate higher similarity.
    pub score: f32,

    /// Zero-based position in the ranked result list.
    pub rank: usize,
}

/// The interface the verification engine needs from a vector store.
///
/// A user has at most one active record: `upsert` replaces any
/// existing record for the same ID and is idempotent under identical
/// arguments. An upsert is atomic with respect to readers; a query
/// never observes a half-written embedding.
///
/// All implementations must be safe for concurrent use (Send + Sync).
pub trait EmbeddingIndex: Send + Sync {
    /// Stores or replaces the active record for `user_id`.
    fn upsert(&self, user_id: &str, embedding: &[f32], meta: RecordMeta)
        -> Result<(), StoreError>;

    /// Returns up to `top_k` records ranked by descending cosine
    /// similarity to the query. Empty when the index holds no records.
    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Match>, StoreError>;

    /// Returns true if an active record exists for `user_id`.
    fn contains(&self, user_id: &str) -> Result<bool, StoreError>;

    /// Removes the record for `user_id`. No error if absent.
    fn delete(&self, user_id: &str) -> Result<(), StoreError>;

    /// Number of active records.
    fn len(&self) -> usize;

    /// True if the index holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
