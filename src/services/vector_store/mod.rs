//! Vector store abstraction layer.
//!
//! Backends implement the storage primitives; length checking and the
//! sequential batched write policy live in the trait's provided `upsert` so
//! every backend behaves the same way.

mod memory;
mod qdrant;

pub use memory::MemoryBackend;
pub use qdrant::QdrantBackend;

use async_trait::async_trait;
use tracing::info;

use crate::error::VectorStoreError;
use crate::models::{
    Chunk, DocumentType, IndexStats, RetrievalResult, VectorDriver, VectorStoreConfig,
};

/// One chunk with its embedding, in the shape persisted by the index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub content: String,
    pub source: String,
    pub doc_type: DocumentType,
    pub chunk_index: u32,
    pub total_chunks: u32,
}

impl VectorRecord {
    pub fn to_result(&self, score: f32) -> RetrievalResult {
        RetrievalResult {
            id: self.id.clone(),
            score,
            content: self.content.clone(),
            source: self.source.clone(),
            chunk_index: self.chunk_index,
        }
    }
}

/// Pair chunks with their embeddings by position.
pub fn pair_records(
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
) -> Result<Vec<VectorRecord>, VectorStoreError> {
    if chunks.len() != embeddings.len() {
        return Err(VectorStoreError::LengthMismatch {
            chunks: chunks.len(),
            embeddings: embeddings.len(),
        });
    }

    Ok(chunks
        .iter()
        .zip(embeddings)
        .map(|(chunk, values)| VectorRecord {
            id: chunk.id.clone(),
            values: values.clone(),
            content: chunk.content.clone(),
            source: chunk.metadata.source.clone(),
            doc_type: chunk.metadata.doc_type,
            chunk_index: chunk.metadata.chunk_index,
            total_chunks: chunk.metadata.total_chunks,
        })
        .collect())
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the index if it doesn't exist and wait until it accepts traffic.
    /// Safe to call repeatedly.
    async fn initialize(&self) -> Result<(), VectorStoreError>;

    /// Write one batch of records. Callers go through [`VectorStore::upsert`].
    async fn write_batch(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError>;

    /// Up to `top_k` nearest records, most similar first. An empty index
    /// yields an empty list.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, VectorStoreError>;

    /// Remove every stored vector.
    async fn delete_all(&self) -> Result<(), VectorStoreError>;

    async fn stats(&self) -> Result<IndexStats, VectorStoreError>;

    /// Maximum records per write.
    fn upsert_batch_size(&self) -> usize;

    fn collection(&self) -> &str;

    /// Store `embeddings[i]` for `chunks[i]`, in sequential batches.
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), VectorStoreError> {
        let records = pair_records(chunks, embeddings)?;
        let total = records.len();
        let mut written = 0;

        for batch in records.chunks(self.upsert_batch_size().max(1)) {
            self.write_batch(batch).await?;
            written += batch.len();
            info!("upserted: {written}/{total}");
        }

        Ok(())
    }
}

/// Create a vector store backend based on configuration.
pub fn create_backend(
    config: &VectorStoreConfig,
    dimension: u32,
) -> Result<Box<dyn VectorStore>, VectorStoreError> {
    match config.driver {
        VectorDriver::Qdrant => Ok(Box::new(QdrantBackend::new(config, dimension)?)),
        VectorDriver::Memory => Ok(Box::new(MemoryBackend::new(config, dimension))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn chunks(n: usize) -> Vec<Chunk> {
        let doc = Document::text("a.txt", "");
        (0..n)
            .map(|i| Chunk::from_document(&doc, i as u64, format!("c{i}"), i as u32, n as u32))
            .collect()
    }

    #[test]
    fn test_pair_records_length_mismatch() {
        for (c, e) in [(3, 2), (0, 1), (2, 0), (5, 6)] {
            let embeddings = vec![vec![1.0]; e];
            match pair_records(&chunks(c), &embeddings) {
                Err(VectorStoreError::LengthMismatch { chunks, embeddings }) => {
                    assert_eq!((chunks, embeddings), (c, e));
                }
                other => panic!("expected mismatch for {c}/{e}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_pair_records_keeps_positions() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let records = pair_records(&chunks(2), &embeddings).unwrap();

        assert_eq!(records[0].id, "chunk_0");
        assert_eq!(records[0].values, vec![1.0, 0.0]);
        assert_eq!(records[1].id, "chunk_1");
        assert_eq!(records[1].values, vec![0.0, 1.0]);
        assert_eq!(records[1].total_chunks, 2);
    }

    #[test]
    fn test_create_memory_backend() {
        let config = VectorStoreConfig {
            driver: VectorDriver::Memory,
            collection: "scratch".to_string(),
            ..Default::default()
        };
        let store = create_backend(&config, 3).unwrap();
        assert_eq!(store.collection(), "scratch");
        assert_eq!(store.upsert_batch_size(), 100);
    }
}
