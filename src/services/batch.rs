//! Order-preserving, rate-paced batch embedding.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::embedding::EmbeddingProvider;
use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;
use crate::utils::{RetryPolicy, retry_with};

/// Decides how long to wait between consecutive batches.
#[async_trait]
pub trait Pacing: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a fixed interval between batches.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval(pub Duration);

#[async_trait]
impl Pacing for FixedInterval {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacing for NoPacing {
    async fn pause(&self) {}
}

/// Embeds many texts with at most `batch_size` requests in flight.
///
/// Each batch is issued concurrently and awaited as a whole before the
/// pacing policy runs and the next batch starts. Results are collected by
/// request position, so `embed_many(texts)[i]` always belongs to `texts[i]`.
#[derive(Clone)]
pub struct EmbeddingBatcher {
    provider: Arc<dyn EmbeddingProvider>,
    pacing: Arc<dyn Pacing>,
    retry: RetryPolicy,
    batch_size: usize,
}

impl EmbeddingBatcher {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        Self {
            provider,
            pacing: Arc::new(NoPacing),
            retry: RetryPolicy::none(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        Self::new(provider, config.batch_size as usize)
            .with_pacing(Arc::new(FixedInterval(Duration::from_millis(
                config.batch_delay_ms,
            ))))
            .with_retry(RetryPolicy::new(config.max_attempts))
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Arc<dyn Pacing>) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embed a single text, e.g. a query.
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        retry_with(&self.retry, || self.provider.embed(text)).await
    }

    /// Embed every text, preserving input order. The first failing request
    /// fails its batch and the whole call.
    pub async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let total = texts.len();
        let mut embeddings = Vec::with_capacity(total);
        info!(total, batch_size = self.batch_size, "generating embeddings");

        for (batch_number, batch) in texts.chunks(self.batch_size).enumerate() {
            if batch_number > 0 {
                self.pacing.pause().await;
            }

            // try_join_all yields outputs in the order the futures were given.
            let batch_embeddings =
                try_join_all(batch.iter().map(|text| self.embed_one(text))).await?;
            embeddings.extend(batch_embeddings);

            let done = embeddings.len();
            debug!(batch = batch_number, done, total, "embedded batch");
            if done % 20 < self.batch_size || done == total {
                info!("embedding progress: {done}/{total}");
            }
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakeEmbedder, RecordingPacer};
    use std::sync::atomic::Ordering;

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("passage number {i}")).collect()
    }

    #[tokio::test]
    async fn test_order_preserved_despite_out_of_order_completion() {
        let embedder = Arc::new(FakeEmbedder::new(8).with_latency());
        let batcher = EmbeddingBatcher::new(embedder.clone(), 5);

        let inputs = texts(13);
        let embeddings = batcher.embed_many(&inputs).await.unwrap();

        assert_eq!(embeddings.len(), inputs.len());
        for (text, embedding) in inputs.iter().zip(&embeddings) {
            assert_eq!(embedding, &FakeEmbedder::vector_for(text, 8));
        }
    }

    #[tokio::test]
    async fn test_in_flight_requests_bounded_by_batch_size() {
        let embedder = Arc::new(FakeEmbedder::new(4).with_latency());
        let batcher = EmbeddingBatcher::new(embedder.clone(), 5);

        batcher.embed_many(&texts(17)).await.unwrap();

        let peak = embedder.peak_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 5, "peak in-flight was {peak}");
        assert!(peak >= 2, "requests within a batch should overlap");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 17);
    }

    #[tokio::test]
    async fn test_pacing_runs_between_batches_only() {
        let embedder = Arc::new(FakeEmbedder::new(4));
        let pacer = Arc::new(RecordingPacer::default());
        let batcher = EmbeddingBatcher::new(embedder, 5).with_pacing(pacer.clone());

        batcher.embed_many(&texts(12)).await.unwrap();
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 2);

        batcher.embed_many(&texts(5)).await.unwrap();
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_failure_fails_whole_call() {
        let embedder = Arc::new(FakeEmbedder::new(4).failing_on("number 7"));
        let pacer = Arc::new(RecordingPacer::default());
        let batcher = EmbeddingBatcher::new(embedder.clone(), 5).with_pacing(pacer.clone());

        let result = batcher.embed_many(&texts(15)).await;
        assert!(matches!(result, Err(EmbeddingError::ServerError(_))));
        // Third batch never starts.
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 1);
        assert!(embedder.calls.load(Ordering::SeqCst) <= 10);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let batcher = EmbeddingBatcher::new(Arc::new(FakeEmbedder::new(4)), 5);
        assert!(batcher.embed_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_recovers_transient_failure_in_place() {
        let embedder = Arc::new(FakeEmbedder::new(4).flaky_once_on("number 2"));
        let batcher = EmbeddingBatcher::new(embedder.clone(), 5).with_retry(
            RetryPolicy::new(3).with_initial_delay(Duration::from_millis(1)),
        );

        let inputs = texts(6);
        let embeddings = batcher.embed_many(&inputs).await.unwrap();
        assert_eq!(embeddings[2], FakeEmbedder::vector_for(&inputs[2], 4));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_fixed_interval_waits() {
        let start = std::time::Instant::now();
        FixedInterval(Duration::from_millis(20)).pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
