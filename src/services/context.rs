//! Turns ranked retrieval results into the context block of a prompt.

use crate::models::RetrievalResult;

/// How each retrieved passage is labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextStyle {
    /// `[Document n] (Source: s, Score: 0.xxx)` headers, for single-shot answers.
    #[default]
    Cited,
    /// Bare `[n]` rank labels, for conversational turns.
    Conversational,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler {
    style: ContextStyle,
}

impl ContextAssembler {
    pub fn new(style: ContextStyle) -> Self {
        Self { style }
    }

    pub fn cited() -> Self {
        Self::new(ContextStyle::Cited)
    }

    pub fn conversational() -> Self {
        Self::new(ContextStyle::Conversational)
    }

    pub fn style(&self) -> ContextStyle {
        self.style
    }

    /// Render results in rank order, one entry per result, separated by a
    /// blank line. Callers short-circuit on empty results before getting here.
    pub fn assemble(&self, results: &[RetrievalResult]) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, result)| self.entry(i + 1, result))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn entry(&self, rank: usize, result: &RetrievalResult) -> String {
        match self.style {
            ContextStyle::Cited => format!(
                "[Document {}] (Source: {}, Score: {:.3})\n{}",
                rank, result.source, result.score, result.content
            ),
            ContextStyle::Conversational => format!("[{}] {}", rank, result.content),
        }
    }
}
