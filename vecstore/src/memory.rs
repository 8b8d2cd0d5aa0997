use std::collections::HashMap;
use std::sync::RwLock;

use crate::cosine::cosine_similarity;
use crate::error::StoreError;
use crate::store::{EmbeddingIndex, Match, RecordMeta};

struct StoredRecord {
    embedding: Vec<f32>,
    #[allow(dead_code)]
    meta: RecordMeta,
}

/// In-memory [`EmbeddingIndex`] using brute-force cosine similarity.
/// Intended for testing, tooling, and small populations.
///
/// The embedding dimension is pinned by the first upsert; later
/// upserts and queries with a different dimension fail with
/// [`StoreError::DimensionMismatch`].
pub struct MemoryIndex {
    inner: RwLock<MemoryIndexInner>,
}

struct MemoryIndexInner {
    records: HashMap<String, StoredRecord>,
    dim: Option<usize>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryIndexInner {
                records: HashMap::new(),
                dim: None,
            }),
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingIndex for MemoryIndex {
    fn upsert(
        &self,
        user_id: &str,
        embedding: &[f32],
        meta: RecordMeta,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if let Some(dim) = inner.dim {
            if embedding.len() != dim {
                return Err(StoreError::DimensionMismatch {
                    got: embedding.len(),
                    want: dim,
                });
            }
        } else {
            inner.dim = Some(embedding.len());
        }
        inner.records.insert(
            user_id.to_string(),
            StoredRecord {
                embedding: embedding.to_vec(),
                meta,
            },
        );
        Ok(())
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Match>, StoreError> {
        let inner = self.inner.read().unwrap();
        if inner.records.is_empty() || top_k == 0 {
            return Ok(vec![]);
        }
        if let Some(dim) = inner.dim {
            if embedding.len() != dim {
                return Err(StoreError::DimensionMismatch {
                    got: embedding.len(),
                    want: dim,
                });
            }
        }

        let mut results: Vec<(String, f32)> = inner
            .records
            .iter()
            .map(|(id, rec)| (id.clone(), cosine_similarity(embedding, &rec.embedding)))
            .collect();

        // Descending by score; ties broken by ID for determinism.
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        if results.len() > top_k {
            results.truncate(top_k);
        }

        Ok(results
            .into_iter()
            .enumerate()
            .map(|(rank, (user_id, score))| Match {
                user_id,
                score,
                rank,
            })
            .collect())
    }

    fn contains(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().unwrap().records.contains_key(user_id))
    }

    fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.inner.write().unwrap().records.remove(user_id);
        Ok(())
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn meta() -> RecordMeta {
        RecordMeta::now("test")
    }

    #[test]
    fn upsert_and_query() {
        let idx = MemoryIndex::new();
        idx.upsert("a", &[1.0, 0.0, 0.0, 0.0], meta()).unwrap();
        idx.upsert("b", &[0.0, 1.0, 0.0, 0.0], meta()).unwrap();
        idx.upsert("c", &[0.9, 0.1, 0.0, 0.0], meta()).unwrap();

        let matches = idx.query(&[1.0, 0.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].user_id, "a");
        assert_eq!(matches[0].rank, 0);
        assert_eq!(matches[1].user_id, "c");
        assert_eq!(matches[1].rank, 1);
    }

    #[test]
    fn self_similarity_is_maximal() {
        let idx = MemoryIndex::new();
        let emb = [0.3, -0.4, 0.5, 0.7];
        idx.upsert("u", &emb, meta()).unwrap();

        let matches = idx.query(&emb, 1).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].user_id, "u");
        assert!((matches[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn upsert_replaces_active_record() {
        let idx = MemoryIndex::new();
        idx.upsert("u", &[1.0, 0.0], meta()).unwrap();
        idx.upsert("u", &[0.0, 1.0], meta()).unwrap();
        assert_eq!(idx.len(), 1);

        let matches = idx.query(&[0.0, 1.0], 1).unwrap();
        assert!((matches[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn upsert_is_idempotent() {
        let idx = MemoryIndex::new();
        let m = meta();
        idx.upsert("u", &[1.0, 0.0], m.clone()).unwrap();
        idx.upsert("u", &[1.0, 0.0], m.clone()).unwrap();
        idx.upsert("u", &[1.0, 0.0], m).unwrap();
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn query_empty_index() {
        let idx = MemoryIndex::new();
        assert!(idx.query(&[1.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn query_zero_top_k() {
        let idx = MemoryIndex::new();
        idx.upsert("u", &[1.0, 0.0], meta()).unwrap();
        assert!(idx.query(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn dimension_is_pinned() {
        let idx = MemoryIndex::new();
        idx.upsert("u", &[1.0, 0.0, 0.0], meta()).unwrap();

        assert!(matches!(
            idx.upsert("v", &[1.0, 0.0], meta()),
            Err(StoreError::DimensionMismatch { got: 2, want: 3 })
        ));
        assert!(idx.query(&[1.0, 0.0], 1).is_err());
    }

    #[test]
    fn contains_and_delete() {
        let idx = MemoryIndex::new();
        idx.upsert("u", &[1.0, 0.0], meta()).unwrap();
        assert!(idx.contains("u").unwrap());
        assert!(!idx.contains("v").unwrap());

        idx.delete("u").unwrap();
        assert!(!idx.contains("u").unwrap());
        assert_eq!(idx.len(), 0);

        // Deleting an absent record is not an error.
        idx.delete("nonexistent").unwrap();
    }

    #[test]
    fn concurrent_upserts_distinct_users() {
        let idx = Arc::new(MemoryIndex::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let idx = Arc::clone(&idx);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("user-{t}-{i}");
                    let emb = [t as f32 + 1.0, i as f32, 1.0];
                    idx.upsert(&id, &emb, RecordMeta::now("test")).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(idx.len(), 400);

        // Every record survived intact.
        let matches = idx.query(&[3.0, 7.0, 1.0], 1).unwrap();
        assert_eq!(matches[0].user_id, "user-2-7");
    }

    #[test]
    fn ties_break_deterministically() {
        let idx = MemoryIndex::new();
        idx.upsert("b", &[1.0, 0.0], meta()).unwrap();
        idx.upsert("a", &[1.0, 0.0], meta()).unwrap();

        let matches = idx.query(&[1.0, 0.0], 2).unwrap();
        assert_eq!(matches[0].user_id, "a");
        assert_eq!(matches[1].user_id, "b");
    }
}
