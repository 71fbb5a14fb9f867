//! Fixed-size overlapping text windows.

use crate::error::ConfigError;
use crate::models::IndexingConfig;

/// Splits text into windows of `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    /// Window length in characters
    chunk_size: usize,
    /// Characters shared by consecutive windows
    overlap: usize,
}

impl TextChunker {
    /// Fails with `InvalidConfig` unless `0 < chunk_size` and `overlap < chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ConfigError::InvalidConfig(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn from_config(config: &IndexingConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size as usize, config.chunk_overlap as usize)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into windows. The last window may be shorter than
    /// `chunk_size`; windows are not trimmed.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        self.spans(chars.len())
            .into_iter()
            .map(|(start, end)| chars[start..end].iter().collect())
            .collect()
    }

    /// Character ranges `[start, end)` of the windows over a text of `len` characters.
    pub fn spans(&self, len: usize) -> Vec<(usize, usize)> {
        let step = self.chunk_size - self.overlap;
        let mut spans = Vec::with_capacity(len / step + 1);
        let mut start = 0;

        while start < len {
            let end = (start + self.chunk_size).min(len);
            spans.push((start, end));

            // A window that reached the end already covers the tail.
            if end >= len {
                break;
            }
            start += step;
        }

        spans
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}
