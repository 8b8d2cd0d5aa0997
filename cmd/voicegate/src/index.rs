//! File-backed embedding index so separate CLI invocations share state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use voicegate_vecstore::{cosine_similarity, EmbeddingIndex, Match, RecordMeta, StoreError};

#[derive(Serialize, Deserialize)]
struct RecordEntry {
    embedding: Vec<f32>,
    meta: RecordMeta,
}

#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    records: BTreeMap<String, RecordEntry>,
}

/// [`EmbeddingIndex`] persisted as a JSON snapshot on every upsert.
/// Small-population tooling only; a production deployment would point
/// the engine at a real vector store behind the same trait.
pub struct FileIndex {
    path: PathBuf,
    state: RwLock<Snapshot>,
}

impl FileIndex {
    /// Opens the snapshot at `path`, starting empty if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Backend(format!("parse {}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "read {}: {e}",
                    path.display()
                )))
            }
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn save(&self, state: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| StoreError::Backend(format!("encode snapshot: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::Backend(format!("write {}: {e}", self.path.display())))
    }
}

impl EmbeddingIndex for FileIndex {
    fn upsert(
        &self,
        user_id: &str,
        embedding: &[f32],
        meta: RecordMeta,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().unwrap();
        state.records.insert(
            user_id.to_string(),
            RecordEntry {
                embedding: embedding.to_vec(),
                meta,
            },
        );
        self.save(&state)
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Match>, StoreError> {
        let state = self.state.read().unwrap();
        if state.records.is_empty() || top_k == 0 {
            return Ok(vec![]);
        }

        let mut results: Vec<(String, f32)> = state
            .records
            .iter()
            .map(|(id, rec)| (id.clone(), cosine_similarity(embedding, &rec.embedding)))
            .collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        results.truncate(top_k);

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
        Ok(self.state.read().unwrap().records.contains_key(user_id))
    }

    fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().unwrap();
        if state.records.remove(user_id).is_some() {
            self.save(&state)?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.state.read().unwrap().records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("voicegate-test-{}-{name}.json", std::process::id()));
        p
    }

    #[test]
    fn persists_across_instances() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        {
            let idx = FileIndex::open(&path).unwrap();
            idx.upsert("alice", &[1.0, 0.0, 0.0], RecordMeta::now("cli"))
                .unwrap();
        }

        let idx = FileIndex::open(&path).unwrap();
        assert!(idx.contains("alice").unwrap());
        let matches = idx.query(&[1.0, 0.0, 0.0], 1).unwrap();
        assert_eq!(matches[0].user_id, "alice");
        assert!((matches[0].score - 1.0).abs() < 1e-6);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_starts_empty() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        let idx = FileIndex::open(&path).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn delete_persists() {
        let path = temp_path("delete");
        let _ = std::fs::remove_file(&path);

        let idx = FileIndex::open(&path).unwrap();
        idx.upsert("u", &[1.0, 0.0], RecordMeta::now("cli")).unwrap();
        idx.delete("u").unwrap();

        let idx = FileIndex::open(&path).unwrap();
        assert!(idx.is_empty());

        std::fs::remove_file(&path).unwrap();
    }
}
