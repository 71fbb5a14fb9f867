//! Error types for the retrieval-augmented chat pipeline.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// The HTTP status of a `"status N: body"` provider message.
fn status_code(msg: &str) -> Option<u16> {
    let (code, _) = msg.strip_prefix("status ")?.split_once(':')?;
    code.trim().parse().ok()
}

/// Returns true when a provider message describes a transient HTTP failure.
/// Only the status code is consulted when one is present; the body may
/// contain arbitrary numbers.
fn is_transient_status(msg: &str) -> bool {
    match status_code(msg) {
        Some(code) => matches!(code, 408 | 429 | 500 | 502 | 503 | 504),
        None => {
            let lower = msg.to_lowercase();
            lower.contains("unavailable")
                || lower.contains("too many requests")
                || lower.contains("resource_exhausted")
        }
    }
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding provider: {0}")]
    ConnectionError(String),

    #[error("embedding provider error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            EmbeddingError::ServerError(msg) => is_transient_status(msg),
            EmbeddingError::RequestError(e) => e.is_timeout() || e.is_connect(),
            EmbeddingError::InvalidResponse(_) => false,
        }
    }
}

/// Errors related to answer generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to connect to generation provider: {0}")]
    ConnectionError(String),

    #[error("generation provider error: {0}")]
    ServerError(String),

    #[error("generation request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid generation response: {0}")]
    InvalidResponse(String),

    #[error("generation provider returned no text")]
    EmptyResponse,

    #[error("generation timeout")]
    Timeout,
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("collection '{0}' did not become ready in time")]
    NotReady(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("search error: {0}")]
    SearchError(String),

    #[error("delete error: {0}")]
    DeleteError(String),

    #[error("chunks and embeddings length mismatch: {chunks} chunks, {embeddings} embeddings")]
    LengthMismatch { chunks: usize, embeddings: usize },

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Errors related to loading documents from disk.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("failed to parse PDF {path}: {message}")]
    PdfError { path: String, message: String },

    #[error("unsupported file: {0}")]
    UnsupportedFile(String),
}

/// Errors raised by an indexing run. Each variant names the step that failed.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("no documents found to index")]
    EmptyCorpus,

    #[error("loading documents failed: {0}")]
    Loading(#[from] SourceError),

    #[error("initializing the vector index failed: {0}")]
    Initialize(#[source] VectorStoreError),

    #[error("generating embeddings failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("storing vectors failed: {0}")]
    Upsert(#[source] VectorStoreError),
}

/// Errors raised while answering a question.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] VectorStoreError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing required configuration: {0}")]
    MissingValue(String),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}
