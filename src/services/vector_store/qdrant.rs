//! Qdrant vector store backend implementation.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CollectionStatus, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use super::{VectorRecord, VectorStore};
use crate::error::VectorStoreError;
use crate::models::{IndexStats, RetrievalResult, VectorStoreConfig};

/// Qdrant vector store backend.
pub struct QdrantBackend {
    client: Qdrant,
    collection: String,
    dimension: u32,
    upsert_batch_size: usize,
    ready_timeout: Duration,
    ready_poll_interval: Duration,
}

impl QdrantBackend {
    pub fn new(config: &VectorStoreConfig, dimension: u32) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            dimension,
            upsert_batch_size: config.upsert_batch_size as usize,
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
            ready_poll_interval: Duration::from_millis(config.ready_poll_interval_ms),
        })
    }

    /// Qdrant only accepts integers and UUIDs as point ids, so chunk ids are
    /// mapped onto a stable UUIDv5. The original id travels in the payload.
    pub fn point_id(chunk_id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()).to_string()
    }

    async fn create_collection(&self) -> Result<(), VectorStoreError> {
        let create_collection = CreateCollectionBuilder::new(&self.collection).vectors_config(
            VectorParamsBuilder::new(u64::from(self.dimension), Distance::Cosine),
        );

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        info!(collection = %self.collection, dimension = self.dimension, "created collection");
        Ok(())
    }

    /// Yellow (optimizing) and Grey (optimizations pending) collections still
    /// serve reads and writes. Only Red, or an unknown status, is not ready.
    fn is_serving(status: i32) -> bool {
        matches!(
            CollectionStatus::try_from(status),
            Ok(CollectionStatus::Green | CollectionStatus::Yellow | CollectionStatus::Grey)
        )
    }

    fn stats_for(&self, points: Option<u64>) -> IndexStats {
        let total = points.unwrap_or(0);
        IndexStats {
            total_record_count: total,
            dimension: self.dimension,
            namespace_count: u32::from(total > 0),
        }
    }

    async fn wait_until_ready(&self) -> Result<(), VectorStoreError> {
        let deadline = Instant::now() + self.ready_timeout;

        loop {
            let info = self
                .client
                .collection_info(&self.collection)
                .await
                .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

            let ready = info.result.is_some_and(|r| Self::is_serving(r.status));
            if ready {
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(VectorStoreError::NotReady(self.collection.clone()));
            }

            debug!(collection = %self.collection, "waiting for collection to become ready");
            tokio::time::sleep(self.ready_poll_interval).await;
        }
    }

    fn payload_for(record: &VectorRecord) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert("chunk_id".to_string(), record.id.clone().into());
        payload.insert("content".to_string(), record.content.clone().into());
        payload.insert("source".to_string(), record.source.clone().into());
        payload.insert("type".to_string(), record.doc_type.to_string().into());
        payload.insert(
            "chunkIndex".to_string(),
            i64::from(record.chunk_index).into(),
        );
        payload.insert(
            "totalChunks".to_string(),
            i64::from(record.total_chunks).into(),
        );
        payload
    }

    fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
        payload.get(key).and_then(|v| match &v.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        })
    }

    fn payload_int(payload: &HashMap<String, Value>, key: &str) -> Option<i64> {
        payload.get(key).and_then(|v| match &v.kind {
            Some(Kind::IntegerValue(n)) => Some(*n),
            Some(Kind::DoubleValue(n)) => Some(*n as i64),
            _ => None,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantBackend {
    async fn initialize(&self) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if exists {
            debug!(collection = %self.collection, "collection already exists");
        } else {
            self.create_collection().await?;
        }

        self.wait_until_ready().await
    }

    async fn write_batch(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                PointStruct::new(
                    Self::point_id(&record.id),
                    record.values.clone(),
                    Self::payload_for(record),
                )
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points).wait(true);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, VectorStoreError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let search = SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k as u64)
            .with_payload(true);

        let results = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorStoreError::SearchError(e.to_string()))?;

        Ok(results
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload;
                RetrievalResult {
                    id: Self::payload_str(&payload, "chunk_id").unwrap_or_default(),
                    score: point.score,
                    content: Self::payload_str(&payload, "content").unwrap_or_default(),
                    source: Self::payload_str(&payload, "source").unwrap_or_default(),
                    chunk_index: Self::payload_int(&payload, "chunkIndex")
                        .and_then(|n| u32::try_from(n).ok())
                        .unwrap_or(0),
                }
            })
            .collect())
    }

    async fn delete_all(&self) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if exists {
            self.client
                .delete_collection(&self.collection)
                .await
                .map_err(|e| VectorStoreError::DeleteError(e.to_string()))?;
        }

        self.create_collection().await?;
        self.wait_until_ready().await
    }

    async fn stats(&self) -> Result<IndexStats, VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if !exists {
            debug!(collection = %self.collection, "collection not created yet");
            return Ok(self.stats_for(None));
        }

        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        Ok(self.stats_for(info.result.and_then(|r| r.points_count)))
    }

    fn upsert_batch_size(&self) -> usize {
        self.upsert_batch_size
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;

    #[test]
    fn test_point_id_is_stable_uuid() {
        let a = QdrantBackend::point_id("chunk_0");
        let b = QdrantBackend::point_id("chunk_0");
        let c = QdrantBackend::point_id("chunk_1");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_payload_round_trip() {
        let record = VectorRecord {
            id: "chunk_7".to_string(),
            values: vec![0.1, 0.2],
            content: "hello".to_string(),
            source: "notes.txt".to_string(),
            doc_type: DocumentType::Text,
            chunk_index: 3,
            total_chunks: 9,
        };
        let payload = QdrantBackend::payload_for(&record);

        assert_eq!(
            QdrantBackend::payload_str(&payload, "chunk_id").as_deref(),
            Some("chunk_7")
        );
        assert_eq!(
            QdrantBackend::payload_str(&payload, "type").as_deref(),
            Some("text")
        );
        assert_eq!(QdrantBackend::payload_int(&payload, "chunkIndex"), Some(3));
        assert_eq!(QdrantBackend::payload_int(&payload, "totalChunks"), Some(9));
        assert_eq!(QdrantBackend::payload_int(&payload, "missing"), None);
    }

    #[test]
    fn test_optimizing_collection_is_serving() {
        assert!(QdrantBackend::is_serving(CollectionStatus::Green as i32));
        assert!(QdrantBackend::is_serving(CollectionStatus::Yellow as i32));
        assert!(QdrantBackend::is_serving(CollectionStatus::Grey as i32));
        assert!(!QdrantBackend::is_serving(CollectionStatus::Red as i32));
        assert!(!QdrantBackend::is_serving(
            CollectionStatus::UnknownCollectionStatus as i32
        ));
        assert!(!QdrantBackend::is_serving(99));
    }

    #[test]
    fn test_missing_collection_reports_empty_stats() {
        let backend = QdrantBackend::new(&VectorStoreConfig::default(), 768).unwrap();

        let stats = backend.stats_for(None);
        assert_eq!(stats.total_record_count, 0);
        assert_eq!(stats.namespace_count, 0);
        assert_eq!(stats.dimension, 768);

        let stats = backend.stats_for(Some(42));
        assert_eq!(stats.total_record_count, 42);
        assert_eq!(stats.namespace_count, 1);
    }

    #[test]
    fn test_backend_builds_without_connecting() {
        let backend = QdrantBackend::new(&VectorStoreConfig::default(), 768).unwrap();
        assert_eq!(backend.collection(), "rag_documents");
        assert_eq!(backend.upsert_batch_size(), 100);
    }
}
