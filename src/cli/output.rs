use std::fmt::Write as FmtWrite;

use crate::models::{Answer, IndexReport, IndexStats, OutputFormat, RetrievalResult};
use crate::utils::preview;

const PREVIEW_CHARS: usize = 100;

pub trait Formatter {
    fn format_answer(&self, answer: &Answer) -> String;
    fn format_sources(&self, sources: &[RetrievalResult]) -> String;
    fn format_index_report(&self, report: &IndexReport) -> String;
    fn format_index_stats(&self, stats: &IndexStats) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_answer(&self, answer: &Answer) -> String {
        let mut output = String::new();
        writeln!(output, "Assistant: {}", answer.answer).unwrap();
        if !answer.sources.is_empty() {
            writeln!(output).unwrap();
            output.push_str(&self.format_sources(&answer.sources));
        }
        output
    }

    fn format_sources(&self, sources: &[RetrievalResult]) -> String {
        let mut output = String::new();
        writeln!(output, "Sources:").unwrap();
        for (i, source) in sources.iter().enumerate() {
            writeln!(
                output,
                "  {}. {} (Score: {:.3})",
                i + 1,
                source.source,
                source.score
            )
            .unwrap();
            writeln!(
                output,
                "     \"{}\"",
                preview(&source.content, PREVIEW_CHARS).replace('\n', " ")
            )
            .unwrap();
        }
        output
    }

    fn format_index_report(&self, report: &IndexReport) -> String {
        let mut output = String::new();
        writeln!(output, "Indexing Complete").unwrap();
        writeln!(output, "-----------------").unwrap();
        writeln!(output, "Documents:      {}", report.documents).unwrap();
        writeln!(output, "Chunks:         {}", report.chunks).unwrap();
        if let Some(stats) = report.stats {
            writeln!(output, "Total vectors:  {}", stats.total_record_count).unwrap();
            writeln!(output, "Dimension:      {}", stats.dimension).unwrap();
        }
        writeln!(output, "Duration:       {}ms", report.duration_ms).unwrap();
        output
    }

    fn format_index_stats(&self, stats: &IndexStats) -> String {
        let mut output = String::new();
        writeln!(output, "Index Statistics:").unwrap();
        writeln!(output, "  - Total vectors: {}", stats.total_record_count).unwrap();
        writeln!(output, "  - Dimension: {}", stats.dimension).unwrap();
        writeln!(output, "  - Namespaces: {}", stats.namespace_count).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| serde_json::json!({"error": e.to_string()}).to_string())
    }
}

impl Formatter for JsonFormatter {
    fn format_answer(&self, answer: &Answer) -> String {
        self.render(answer)
    }

    fn format_sources(&self, sources: &[RetrievalResult]) -> String {
        self.render(&serde_json::json!({ "sources": sources }))
    }

    fn format_index_report(&self, report: &IndexReport) -> String {
        self.render(report)
    }

    fn format_index_stats(&self, stats: &IndexStats) -> String {
        self.render(stats)
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_answer(&self, answer: &Answer) -> String {
        let mut output = String::new();
        writeln!(output, "## Answer\n").unwrap();
        writeln!(output, "{}\n", answer.answer).unwrap();
        if !answer.sources.is_empty() {
            output.push_str(&self.format_sources(&answer.sources));
        }
        output
    }

    fn format_sources(&self, sources: &[RetrievalResult]) -> String {
        let mut output = String::new();
        writeln!(output, "### Sources\n").unwrap();
        for (i, source) in sources.iter().enumerate() {
            writeln!(
                output,
                "{}. `{}` (Score: {:.3})",
                i + 1,
                source.source,
                source.score
            )
            .unwrap();
            writeln!(
                output,
                "   > {}",
                preview(&source.content, PREVIEW_CHARS).replace('\n', " ")
            )
            .unwrap();
        }
        output
    }

    fn format_index_report(&self, report: &IndexReport) -> String {
        let mut output = String::new();
        writeln!(output, "## Indexing Complete\n").unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Documents | {} |", report.documents).unwrap();
        writeln!(output, "| Chunks | {} |", report.chunks).unwrap();
        if let Some(stats) = report.stats {
            writeln!(output, "| Total vectors | {} |", stats.total_record_count).unwrap();
            writeln!(output, "| Dimension | {} |", stats.dimension).unwrap();
        }
        writeln!(output, "| Duration | {}ms |", report.duration_ms).unwrap();
        output
    }

    fn format_index_stats(&self, stats: &IndexStats) -> String {
        let mut output = String::new();
        writeln!(output, "## Index Statistics\n").unwrap();
        writeln!(output, "- **Total vectors:** {}", stats.total_record_count).unwrap();
        writeln!(output, "- **Dimension:** {}", stats.dimension).unwrap();
        writeln!(output, "- **Namespaces:** {}", stats.namespace_count).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("> **Error:** {}\n", error)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}
