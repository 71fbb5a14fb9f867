mod config;
mod conversation;
mod document;
mod search;

pub use config::{
    ChatConfig, Config, DEFAULT_COLLECTION, DEFAULT_DOCUMENTS_PATH, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_GEMINI_BASE_URL, DEFAULT_GENERATION_MODEL,
    DEFAULT_QDRANT_URL, EmbeddingConfig, IndexingConfig, ProviderConfig, VectorDriver,
    VectorStoreConfig,
};
pub use conversation::{ConversationHistory, DEFAULT_HISTORY_LIMIT, Role, Turn};
pub use document::{Chunk, ChunkMetadata, Document, DocumentMetadata, DocumentType};
pub use search::{Answer, IndexReport, IndexStats, OutputFormat, RetrievalResult};
