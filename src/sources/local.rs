//! Local directory document source.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::DocumentSource;
use crate::error::SourceError;
use crate::models::{Document, DocumentType};

/// Loads `.txt` and `.pdf` files from the top level of a directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
    max_file_size: u64,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            root: root.into(),
            max_file_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files directly inside the root, sorted by file name.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::DirectoryNotFound(
                self.root.display().to_string(),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .follow_links(true)
        {
            let entry = entry.map_err(|e| SourceError::ReadError {
                path: self.root.display().to_string(),
                message: e.to_string(),
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Document type for a path, by extension.
    pub fn detect_type(path: &Path) -> Option<DocumentType> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(DocumentType::Text),
            "pdf" => Some(DocumentType::Pdf),
            _ => None,
        }
    }

    /// Read one file into a document. The file name becomes the source.
    pub fn read_document(&self, path: &Path) -> Result<Document, SourceError> {
        let display = path.display().to_string();
        let doc_type =
            Self::detect_type(path).ok_or_else(|| SourceError::UnsupportedFile(display.clone()))?;

        let size = std::fs::metadata(path)
            .map_err(|e| SourceError::ReadError {
                path: display.clone(),
                message: e.to_string(),
            })?
            .len();
        if size > self.max_file_size {
            return Err(SourceError::ReadError {
                path: display,
                message: format!("file too large ({size} bytes, max {})", self.max_file_size),
            });
        }

        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| display.clone());

        match doc_type {
            DocumentType::Text => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| SourceError::ReadError {
                        path: display,
                        message: e.to_string(),
                    })?;
                Ok(Document::text(source, content))
            }
            DocumentType::Pdf => {
                let bytes = std::fs::read(path).map_err(|e| SourceError::ReadError {
                    path: display.clone(),
                    message: e.to_string(),
                })?;
                let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
                    SourceError::PdfError {
                        path: display,
                        message: e.to_string(),
                    }
                })?;
                Ok(Document::pdf(source, pages.join("\n"), pages.len() as u32))
            }
        }
    }
}

impl DocumentSource for LocalSource {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    fn load(&self) -> Result<Vec<Document>, SourceError> {
        let mut documents = Vec::new();

        for path in self.collect_files()? {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if Self::detect_type(&path).is_none() {
                info!("skipping unsupported file: {file_name}");
                continue;
            }

            match self.read_document(&path) {
                Ok(document) => {
                    debug!(source = %document.metadata.source, "loaded document");
                    documents.push(document);
                }
                Err(e) => warn!("failed to load {file_name}: {e}"),
            }
        }

        info!("total documents loaded: {}", documents.len());
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MAX: u64 = 10 * 1024 * 1024;

    #[test]
    fn test_loads_text_files_sorted_and_skips_others() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.TXT"), "first").unwrap();
        fs::write(dir.path().join("image.png"), [0u8, 1, 2]).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "hidden").unwrap();

        let docs = LocalSource::new(dir.path(), MAX).load().unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.source, "a.TXT");
        assert_eq!(docs[0].content, "first");
        assert_eq!(docs[0].metadata.doc_type, DocumentType::Text);
        assert_eq!(docs[1].metadata.source, "b.txt");
        assert_eq!(docs[1].metadata.pages, None);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = LocalSource::new(dir.path().join("absent"), MAX).load();
        assert!(matches!(result, Err(SourceError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_broken_pdf_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.pdf"), "not a pdf").unwrap();
        fs::write(dir.path().join("ok.txt"), "fine").unwrap();

        let source = LocalSource::new(dir.path(), MAX);
        assert!(matches!(
            source.read_document(&dir.path().join("broken.pdf")),
            Err(SourceError::PdfError { .. })
        ));

        let docs = source.load().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.source, "ok.txt");
    }

    #[test]
    fn test_oversized_file_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.txt"), "x".repeat(64)).unwrap();
        fs::write(dir.path().join("small.txt"), "x").unwrap();

        let docs = LocalSource::new(dir.path(), 16).load().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.source, "small.txt");
    }

    #[test]
    fn test_detect_type() {
        assert_eq!(
            LocalSource::detect_type(Path::new("x.pdf")),
            Some(DocumentType::Pdf)
        );
        assert_eq!(
            LocalSource::detect_type(Path::new("x.txt")),
            Some(DocumentType::Text)
        );
        assert_eq!(LocalSource::detect_type(Path::new("x.md")), None);
        assert_eq!(LocalSource::detect_type(Path::new("README")), None);
    }
}
