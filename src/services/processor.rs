//! Turns loaded documents into identified, metadata-tagged chunks.

use tracing::{debug, info};

use super::chunker::TextChunker;
use crate::models::{Chunk, Document};
use crate::utils::is_blank;

#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    chunker: TextChunker,
    /// Emit chunks that are empty after trimming.
    keep_empty: bool,
}

impl DocumentProcessor {
    pub fn new(chunker: TextChunker) -> Self {
        Self {
            chunker,
            keep_empty: false,
        }
    }

    /// Keep whitespace-only chunks (as empty strings) for compatibility with
    /// indexes built by tools that never filtered them.
    #[must_use]
    pub fn keep_empty_chunks(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    /// Chunk every document in order. Ids run `chunk_0, chunk_1, ...` across
    /// the whole call; `chunkIndex`/`totalChunks` are relative to each document.
    pub fn process(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut sequence: u64 = 0;

        for document in documents {
            let windows: Vec<String> = self
                .chunker
                .chunk(&document.content)
                .into_iter()
                .filter(|window| self.keep_empty || !is_blank(window))
                .map(|window| window.trim().to_string())
                .collect();

            let total = windows.len() as u32;
            debug!(
                source = %document.metadata.source,
                chunks = total,
                "chunked document"
            );

            for (index, content) in windows.into_iter().enumerate() {
                chunks.push(Chunk::from_document(
                    document,
                    sequence,
                    content,
                    index as u32,
                    total,
                ));
                sequence += 1;
            }
        }

        info!(documents = documents.len(), chunks = chunks.len(), "processed documents");
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;

    fn processor(chunk_size: usize, overlap: usize) -> DocumentProcessor {
        DocumentProcessor::new(TextChunker::new(chunk_size, overlap).unwrap())
    }

    #[test]
    fn test_ids_are_global_and_indices_per_document() {
        // With size 10 / overlap 3: 15 chars -> 2 chunks, 24 chars -> 3, 5 chars -> 1.
        let documents = vec![
            Document::text("a.txt", "A".repeat(15)),
            Document::text("b.txt", "B".repeat(24)),
            Document::pdf("c.pdf", "C".repeat(5), 1),
        ];

        let chunks = processor(10, 3).process(&documents);

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["chunk_0", "chunk_1", "chunk_2", "chunk_3", "chunk_4", "chunk_5"]
        );

        let per_chunk: Vec<(&str, u32, u32)> = chunks
            .iter()
            .map(|c| {
                (
                    c.metadata.source.as_str(),
                    c.metadata.chunk_index,
                    c.metadata.total_chunks,
                )
            })
            .collect();
        assert_eq!(
            per_chunk,
            vec![
                ("a.txt", 0, 2),
                ("a.txt", 1, 2),
                ("b.txt", 0, 3),
                ("b.txt", 1, 3),
                ("b.txt", 2, 3),
                ("c.pdf", 0, 1),
            ]
        );
        assert_eq!(chunks[5].metadata.doc_type, DocumentType::Pdf);
        assert_eq!(chunks[5].metadata.pages, Some(1));
    }

    #[test]
    fn test_chunks_are_trimmed() {
        let documents = vec![Document::text("a.txt", "  hello world  ")];
        let chunks = processor(100, 10).process(&documents);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "hello world");
    }

    #[test]
    fn test_blank_chunks_dropped_by_default() {
        // Second window is all spaces.
        let text = format!("{}{}", "x".repeat(5), " ".repeat(10));
        let documents = vec![Document::text("a.txt", text)];

        let chunks = processor(5, 0).process(&documents);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.total_chunks, 1);
        assert_eq!(chunks[0].content, "xxxxx");
    }

    #[test]
    fn test_blank_chunks_kept_when_requested() {
        let text = format!("{}{}", "x".repeat(5), " ".repeat(10));
        let documents = vec![Document::text("a.txt", text)];

        let chunks = processor(5, 0).keep_empty_chunks(true).process(&documents);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, "");
        assert_eq!(chunks[2].id, "chunk_2");
        assert!(chunks.iter().all(|c| c.metadata.total_chunks == 3));
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let documents = vec![Document::text("empty.txt", ""), Document::text("b.txt", "b")];
        let chunks = processor(10, 2).process(&documents);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "chunk_0");
        assert_eq!(chunks[0].metadata.source, "b.txt");
    }
}
