//! Retrieval and answer models.

use serde::{Deserialize, Serialize};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
    /// Documentation-friendly Markdown format
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// A stored chunk matched by a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    /// Chunk ID (`chunk_<n>`)
    pub id: String,

    /// Similarity score, higher is more similar
    pub score: f32,

    pub content: String,

    pub source: String,

    pub chunk_index: u32,
}

/// Answer text plus the passages it was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<RetrievalResult>,
}

impl Answer {
    pub const NO_INFORMATION: &'static str =
        "I couldn't find any relevant information to answer your question.";

    /// The fixed reply for a question with no matching passages.
    pub fn no_information() -> Self {
        Self {
            answer: Self::NO_INFORMATION.to_string(),
            sources: Vec::new(),
        }
    }
}

/// Aggregate metadata reported by the vector index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_record_count: u64,
    pub dimension: u32,
    pub namespace_count: u32,
}

/// Summary of one indexing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexReport {
    pub documents: u64,
    pub chunks: u64,
    /// Index statistics read after the run, if the index reported them.
    pub stats: Option<IndexStats>,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_no_information_answer() {
        let answer = Answer::no_information();
        assert_eq!(
            answer.answer,
            "I couldn't find any relevant information to answer your question."
        );
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_retrieval_result_serializes_camel_case() {
        let result = RetrievalResult {
            id: "chunk_3".to_string(),
            score: 0.5,
            content: "text".to_string(),
            source: "a.txt".to_string(),
            chunk_index: 2,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["chunkIndex"], 2);
    }
}
