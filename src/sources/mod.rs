//! Document sources.

mod local;

pub use local::LocalSource;

use crate::error::SourceError;
use crate::models::Document;

/// Something that yields an ordered list of documents to index.
pub trait DocumentSource: Send + Sync {
    /// Human-readable name, used in logs.
    fn name(&self) -> String;

    /// Load every document. Individual unreadable items are skipped;
    /// an error means the source as a whole is unusable.
    fn load(&self) -> Result<Vec<Document>, SourceError>;
}
