use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::search::OutputFormat;
use crate::error::ConfigError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 768;
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "rag_documents";
pub const DEFAULT_DOCUMENTS_PATH: &str = "./documents";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ragchat").join("config.toml"))
    }

    /// Load the config file (if any), apply environment overrides, and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override file values with environment variables. `lookup` is injected
    /// so tests don't have to touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = non_empty("GEMINI_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(url) = non_empty("QDRANT_URL") {
            self.vector_store.url = url;
        }
        if let Some(key) = non_empty("QDRANT_API_KEY") {
            self.vector_store.api_key = Some(key);
        }
        if let Some(collection) = non_empty("QDRANT_COLLECTION") {
            self.vector_store.collection = collection;
        }
        if let Some(dim) = non_empty("EMBEDDING_DIMENSION").and_then(|v| v.parse().ok()) {
            self.embedding.dimension = dim;
        }
        if let Some(size) = non_empty("CHUNK_SIZE").and_then(|v| v.parse().ok()) {
            self.indexing.chunk_size = size;
        }
        if let Some(overlap) = non_empty("CHUNK_OVERLAP").and_then(|v| v.parse().ok()) {
            self.indexing.chunk_overlap = overlap;
        }
        if let Some(path) = non_empty("DOCUMENTS_PATH") {
            self.indexing.documents_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::InvalidConfig(msg.to_string()));

        if self.indexing.chunk_size == 0 {
            return invalid("indexing.chunk_size must be greater than 0");
        }
        if self.indexing.chunk_overlap >= self.indexing.chunk_size {
            return Err(ConfigError::InvalidConfig(format!(
                "indexing.chunk_overlap ({}) must be smaller than indexing.chunk_size ({})",
                self.indexing.chunk_overlap, self.indexing.chunk_size
            )));
        }
        if self.embedding.batch_size == 0 {
            return invalid("embedding.batch_size must be greater than 0");
        }
        if self.embedding.dimension == 0 {
            return invalid("embedding.dimension must be greater than 0");
        }
        if self.vector_store.upsert_batch_size == 0 {
            return invalid("vector_store.upsert_batch_size must be greater than 0");
        }
        if self.chat.top_k == 0 {
            return invalid("chat.top_k must be greater than 0");
        }
        if self.chat.history_limit == 0 || self.chat.history_limit % 2 != 0 {
            return invalid("chat.history_limit must be a positive even number");
        }
        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.provider
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingValue("GEMINI_API_KEY".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_generation_model() -> String {
    DEFAULT_GENERATION_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_dimension")]
    pub dimension: u32,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_dimension() -> u32 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_batch_size() -> u32 {
    5
}

fn default_batch_delay_ms() -> u64 {
    200
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Vector store backend driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorDriver {
    #[default]
    Qdrant,
    /// Process-local index, lost on exit.
    Memory,
}

impl std::fmt::Display for VectorDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorDriver::Qdrant => write!(f, "qdrant"),
            VectorDriver::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub driver: VectorDriver,

    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_upsert_batch_size")]
    pub upsert_batch_size: u32,

    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,

    #[serde(default = "default_ready_poll_interval")]
    pub ready_poll_interval_ms: u64,
}

fn default_qdrant_url() -> String {
    DEFAULT_QDRANT_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_upsert_batch_size() -> u32 {
    100
}

fn default_ready_timeout() -> u64 {
    60
}

fn default_ready_poll_interval() -> u64 {
    1000
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            driver: VectorDriver::default(),
            url: default_qdrant_url(),
            collection: default_collection(),
            api_key: None,
            upsert_batch_size: default_upsert_batch_size(),
            ready_timeout_secs: default_ready_timeout(),
            ready_poll_interval_ms: default_ready_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    #[serde(default = "default_documents_path")]
    pub documents_path: PathBuf,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: u32,

    /// Emit chunks that are empty after trimming instead of dropping them.
    #[serde(default)]
    pub keep_empty_chunks: bool,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_documents_path() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENTS_PATH)
}

fn default_chunk_size() -> u32 {
    1000
}

fn default_chunk_overlap() -> u32 {
    200
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            documents_path: default_documents_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            keep_empty_chunks: false,
            max_file_size: default_max_file_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_top_k() -> u32 {
    4
}

fn default_history_limit() -> u32 {
    10
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            history_limit: default_history_limit(),
            default_format: OutputFormat::Text,
        }
    }
}
