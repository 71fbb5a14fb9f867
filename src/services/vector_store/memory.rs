//! In-memory vector store for tests and offline runs.
//!
//! Vector search is brute-force cosine similarity over all stored records.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{VectorRecord, VectorStore};
use crate::error::VectorStoreError;
use crate::models::{IndexStats, RetrievalResult, VectorStoreConfig};

pub struct MemoryBackend {
    records: RwLock<Vec<VectorRecord>>,
    collection: String,
    dimension: u32,
    upsert_batch_size: usize,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new(config: &VectorStoreConfig, dimension: u32) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            collection: config.collection.clone(),
            dimension,
            upsert_batch_size: config.upsert_batch_size as usize,
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `write_batch` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_dimension(&self, len: usize) -> Result<(), VectorStoreError> {
        let expected = self.dimension as usize;
        if len != expected {
            return Err(VectorStoreError::DimensionMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

#[async_trait]
impl VectorStore for MemoryBackend {
    async fn initialize(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }

    async fn write_batch(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        for record in records {
            self.check_dimension(record.values.len())?;
        }

        let mut stored = self.records.write().await;
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => stored.push(record.clone()),
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, VectorStoreError> {
        self.check_dimension(vector.len())?;

        let stored = self.records.read().await;
        let mut scored: Vec<(f32, &VectorRecord)> = stored
            .iter()
            .map(|r| (cosine_similarity(vector, &r.values), r))
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, record)| record.to_result(score))
            .collect())
    }

    async fn delete_all(&self) -> Result<(), VectorStoreError> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<IndexStats, VectorStoreError> {
        let total = self.records.read().await.len() as u64;
        Ok(IndexStats {
            total_record_count: total,
            dimension: self.dimension,
            namespace_count: u32::from(total > 0),
        })
    }

    fn upsert_batch_size(&self) -> usize {
        self.upsert_batch_size
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}
