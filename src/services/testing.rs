//! Fake providers for unit tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::batch::Pacing;
use super::embedding::EmbeddingProvider;
use super::generation::AnswerGenerator;
use crate::error::{EmbeddingError, GenerationError};

/// Deterministic embedder. Vectors depend only on the text, so a result can
/// be checked against the text it was produced for.
#[derive(Default)]
pub struct FakeEmbedder {
    dimension: usize,
    latency: bool,
    fail_on: Option<String>,
    flaky_on: Option<String>,
    flaked: Mutex<HashSet<String>>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Sleep 1-8ms per request, varying by text, so completions interleave.
    pub fn with_latency(mut self) -> Self {
        self.latency = true;
        self
    }

    /// Permanently fail any text containing `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Fail the first request for a text containing `needle` with a transient error.
    pub fn flaky_once_on(mut self, needle: &str) -> Self {
        self.flaky_on = Some(needle.to_string());
        self
    }

    pub fn vector_for(text: &str, dimension: usize) -> Vec<f32> {
        let bytes = text.as_bytes();
        (0..dimension)
            .map(|i| {
                let sum: u32 = bytes
                    .iter()
                    .enumerate()
                    .map(|(j, b)| u32::from(*b) * ((i + j) as u32 % 7 + 1))
                    .sum();
                (sum % 1000) as f32 / 1000.0 + 0.001
            })
            .collect()
    }

    fn latency_for(text: &str) -> Duration {
        let sum: u64 = text.bytes().map(u64::from).sum();
        Duration::from_millis(1 + sum % 8)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.latency {
            tokio::time::sleep(Self::latency_for(text)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(needle) = &self.fail_on
            && text.contains(needle.as_str())
        {
            return Err(EmbeddingError::ServerError(format!(
                "status 400: cannot embed '{text}'"
            )));
        }

        if let Some(needle) = &self.flaky_on
            && text.contains(needle.as_str())
            && self.flaked.lock().unwrap().insert(text.to_string())
        {
            return Err(EmbeddingError::Timeout);
        }

        Ok(Self::vector_for(text, self.dimension))
    }

    fn model_name(&self) -> &str {
        "fake-embedder"
    }
}

/// Generator that echoes a canned answer and records every prompt.
#[derive(Default)]
pub struct FakeGenerator {
    answer: String,
    fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AnswerGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(GenerationError::ServerError("status 503: overloaded".to_string()));
        }
        Ok(self.answer.clone())
    }

    fn model_name(&self) -> &str {
        "fake-generator"
    }
}

/// Pacing policy that only counts how often it was asked to wait.
#[derive(Default)]
pub struct RecordingPacer {
    pub pauses: AtomicUsize,
}

#[async_trait]
impl Pacing for RecordingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}
