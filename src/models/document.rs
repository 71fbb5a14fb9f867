use serde::{Deserialize, Serialize};

/// Kind of file a document was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Text,
    Pdf,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Text => write!(f, "text"),
            DocumentType::Pdf => write!(f, "pdf"),
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(DocumentType::Text),
            "pdf" => Ok(DocumentType::Pdf),
            _ => Err(format!("unknown document type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Identifier of the origin, usually the file name.
    pub source: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pages: Option<u32>,
}

/// A loaded document, ready to be chunked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn text(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                doc_type: DocumentType::Text,
                pages: None,
            },
        }
    }

    pub fn pdf(source: impl Into<String>, content: impl Into<String>, pages: u32) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                doc_type: DocumentType::Pdf,
                pages: Some(pages),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub source: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Position of this chunk within its document.
    pub chunk_index: u32,
    /// Number of chunks emitted for the same document.
    pub total_chunks: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pages: Option<u32>,
}

/// A trimmed window of a document, the unit of embedding and retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn generate_id(sequence: u64) -> String {
        format!("chunk_{}", sequence)
    }

    pub fn from_document(
        document: &Document,
        sequence: u64,
        content: String,
        chunk_index: u32,
        total_chunks: u32,
    ) -> Self {
        Self {
            id: Self::generate_id(sequence),
            content,
            metadata: ChunkMetadata {
                source: document.metadata.source.clone(),
                doc_type: document.metadata.doc_type,
                chunk_index,
                total_chunks,
                pages: document.metadata.pages,
            },
        }
    }
}
