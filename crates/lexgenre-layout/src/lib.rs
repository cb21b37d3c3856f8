use std::path::Path;

use thiserror::Error;

pub mod config;
pub mod metrics;
pub mod segment;
pub mod separator;
pub mod title;

pub use config::{LayoutConfig, LayoutConfigBuilder, MarkerSet};
pub use metrics::compute_metrics;
pub use segment::{PageOutcome, SegmentedDocument, segment_document};
pub use separator::{SeparatorDetection, detect_separator};
pub use title::{UNKNOWN_TITLE, extract_title};

use lexgenre_core::{BackendError, DocumentMetrics, PageGeometry, PageSource};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("document has no pages")]
    EmptyDocument,
}

/// Everything derived from a document's page geometry.
#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    pub segmented: SegmentedDocument,
    pub metrics: DocumentMetrics,
    /// Heuristic title from the first page, used when no title is supplied.
    pub title_guess: String,
}

/// Segment pages, compute metrics and guess a title.
pub fn analyze_pages(pages: &[PageGeometry], config: &LayoutConfig) -> AnalyzedDocument {
    let segmented = segment_document(pages, config);
    let metrics = compute_metrics(&segmented, config);
    let title_guess = pages
        .first()
        .map(|p| extract_title(&p.full_text()))
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    tracing::debug!(
        pages = segmented.page_count(),
        with_separator = segmented.pages_with_separator(),
        main_words = metrics.main_words,
        footnote_words = metrics.footnote_words,
        "analyzed document"
    );

    AnalyzedDocument {
        segmented,
        metrics,
        title_guess,
    }
}

/// Extract page geometry through `source` and analyze it.
///
/// A document without any pages is an extraction failure rather than an
/// empty analysis.
pub fn extract_document(
    path: &Path,
    source: &dyn PageSource,
    config: &LayoutConfig,
) -> Result<AnalyzedDocument, LayoutError> {
    let pages = source.extract_pages(path)?;
    if pages.is_empty() {
        return Err(LayoutError::EmptyDocument);
    }
    Ok(analyze_pages(&pages, config))
}
