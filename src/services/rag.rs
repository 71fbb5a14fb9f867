//! Retrieval-augmented answering: index documents, then answer questions
//! from the passages closest to them.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::batch::EmbeddingBatcher;
use super::chunker::TextChunker;
use super::context::ContextAssembler;
use super::embedding::GeminiEmbeddingClient;
use super::generation::{AnswerGenerator, GeminiGenerationClient};
use super::processor::DocumentProcessor;
use super::prompt;
use super::session::SessionStore;
use super::vector_store::{VectorStore, create_backend};
use crate::error::{AppError, IndexError, QueryError, VectorStoreError};
use crate::models::{
    Answer, Config, ConversationHistory, Document, IndexReport, IndexStats, RetrievalResult,
};
use crate::sources::{DocumentSource, LocalSource};
use crate::utils::is_blank;

const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub struct RagService {
    processor: DocumentProcessor,
    embedder: EmbeddingBatcher,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn AnswerGenerator>,
    max_file_size: u64,
}

impl RagService {
    pub fn new(
        processor: DocumentProcessor,
        embedder: EmbeddingBatcher,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            processor,
            embedder,
            store,
            generator,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Build the Gemini-backed service described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let api_key = config.require_api_key()?;

        let embedding_client = GeminiEmbeddingClient::new(&config.provider, api_key)?;
        let generator = GeminiGenerationClient::new(&config.provider, api_key)?;
        let store = create_backend(&config.vector_store, config.embedding.dimension)?;

        let processor = DocumentProcessor::new(TextChunker::from_config(&config.indexing)?)
            .keep_empty_chunks(config.indexing.keep_empty_chunks);
        let embedder = EmbeddingBatcher::from_config(Arc::new(embedding_client), &config.embedding);

        debug!(
            driver = %config.vector_store.driver,
            collection = %config.vector_store.collection,
            embedding_model = %config.provider.embedding_model,
            generation_model = %config.provider.generation_model,
            "built rag service"
        );

        Ok(Self::new(processor, embedder, Arc::from(store), Arc::new(generator))
            .with_max_file_size(config.indexing.max_file_size))
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }

    /// Make sure the vector index exists and is ready. Idempotent.
    pub async fn initialize(&self) -> Result<(), VectorStoreError> {
        info!(collection = self.store.collection(), "initializing vector index");
        self.store.initialize().await
    }

    /// Load every supported file in `path` and index it.
    pub async fn index_directory(&self, path: &Path) -> Result<IndexReport, IndexError> {
        let source = LocalSource::new(path, self.max_file_size);
        self.index_source(&source).await
    }

    pub async fn index_source(&self, source: &dyn DocumentSource) -> Result<IndexReport, IndexError> {
        info!("step 1: loading documents from {}", source.name());
        let documents = source.load()?;
        self.index_documents(&documents).await
    }

    /// Chunk, embed and store `documents`. Any failing step aborts the run.
    pub async fn index_documents(&self, documents: &[Document]) -> Result<IndexReport, IndexError> {
        let started = Instant::now();
        if documents.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        self.store.initialize().await.map_err(IndexError::Initialize)?;

        info!("step 2: processing {} documents into chunks", documents.len());
        let chunks = self.processor.process(documents);
        if chunks.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        info!("step 3: generating embeddings for {} chunks", chunks.len());
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_many(&texts).await?;

        info!("step 4: storing vectors in '{}'", self.store.collection());
        self.store
            .upsert(&chunks, &embeddings)
            .await
            .map_err(IndexError::Upsert)?;

        let stats = match self.store.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("failed to read index stats: {e}");
                None
            }
        };

        let report = IndexReport {
            documents: documents.len() as u64,
            chunks: chunks.len() as u64,
            stats,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            documents = report.documents,
            chunks = report.chunks,
            duration_ms = report.duration_ms,
            "indexing complete"
        );
        Ok(report)
    }

    /// Answer a single question with cited context.
    pub async fn query(&self, question: &str, top_k: usize) -> Result<Answer, QueryError> {
        let results = self.retrieve(question, top_k).await?;
        if results.is_empty() {
            return Ok(Answer::no_information());
        }

        let context = ContextAssembler::cited().assemble(&results);
        let answer = self
            .generator
            .generate(&prompt::cited_prompt(question, &context))
            .await?;

        Ok(Answer {
            answer,
            sources: results,
        })
    }

    /// Answer a question in the context of `history`. The turn is recorded
    /// only when an answer was generated; failures leave `history` untouched.
    pub async fn query_with_history(
        &self,
        history: &mut ConversationHistory,
        question: &str,
        top_k: usize,
    ) -> Result<Answer, QueryError> {
        let results = self.retrieve(question, top_k).await?;
        if results.is_empty() {
            return Ok(Answer::no_information());
        }

        let context = ContextAssembler::conversational().assemble(&results);
        let prompt = prompt::conversational_prompt(question, &context, &history.to_prompt_text());
        let answer = self.generator.generate(&prompt).await?;

        history.record_turn(question, answer.clone());
        Ok(Answer {
            answer,
            sources: results,
        })
    }

    /// Conversational query against a stored session. The session stays
    /// locked for the whole turn.
    pub async fn query_session(
        &self,
        sessions: &SessionStore,
        session_id: &str,
        question: &str,
        top_k: usize,
    ) -> Result<Answer, QueryError> {
        let handle = sessions.session(session_id).await;
        let mut history = handle.lock().await;
        self.query_with_history(&mut history, question, top_k).await
    }

    pub async fn stats(&self) -> Result<IndexStats, VectorStoreError> {
        self.store.stats().await
    }

    /// Delete every stored vector.
    pub async fn clear_index(&self) -> Result<(), VectorStoreError> {
        warn!(collection = self.store.collection(), "deleting all vectors");
        self.store.delete_all().await
    }

    async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalResult>, QueryError> {
        if is_blank(question) {
            return Err(QueryError::InvalidQuery(
                "question must not be empty".to_string(),
            ));
        }

        let vector = self.embedder.embed_one(question).await?;
        let results = self.store.query(&vector, top_k).await?;
        debug!(matches = results.len(), top_k, "retrieved passages");
        Ok(results)
    }
}
