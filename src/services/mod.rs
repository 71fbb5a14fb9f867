mod batch;
mod chunker;
mod context;
mod embedding;
mod generation;
mod processor;
pub mod prompt;
mod rag;
mod session;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{EmbeddingBatcher, FixedInterval, NoPacing, Pacing};
pub use chunker::TextChunker;
pub use context::{ContextAssembler, ContextStyle};
pub use embedding::{EmbeddingProvider, GeminiEmbeddingClient};
pub use generation::{AnswerGenerator, GeminiGenerationClient};
pub use processor::DocumentProcessor;
pub use rag::RagService;
pub use session::{SessionHandle, SessionStore};
pub use vector_store::{MemoryBackend, QdrantBackend, VectorRecord, VectorStore, create_backend};
