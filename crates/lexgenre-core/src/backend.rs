use std::path::Path;

use thiserror::Error;

use crate::geometry::PageGeometry;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract page content: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for page content extraction backends.
///
/// Implementors turn a document on disk into per-page geometry and text; the
/// segmentation and metrics stages live in `lexgenre_layout`. An OCR engine
/// plugs in behind the same trait and returns pages with text but no
/// geometry primitives.
pub trait PageSource: Send + Sync {
    /// Extract every page of the document in order.
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageGeometry>, BackendError>;
}
