use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod batch;
pub mod dump;
pub mod manifest;
pub mod pipeline;

pub use batch::{BatchEvent, BatchOutput, DocumentStatus, run_batch};
pub use dump::{DumpMetadata, GeometryDump, parse_dump, read_dump};
pub use manifest::{JournalInfo, Manifest, ManifestEntry, load_manifest, volume_for_year};
pub use pipeline::{ClassifiedDocument, DocumentOutcome, classify_extracted, process_document};

use lexgenre_layout::{AnalyzedDocument, LayoutConfig, LayoutError, analyze_pages};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("layout analysis failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid geometry dump: {0}")]
    InvalidDump(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] toml::de::Error),
    #[error("no publication year for {}", .0.display())]
    MissingYear(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of lexgenre-ingest)")]
    NoPdfSupport,
}

/// Layout analysis plus any metadata the input carried.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub analysis: AnalyzedDocument,
    pub metadata: DumpMetadata,
}

/// `.json` inputs are geometry dumps; everything else is treated as a PDF.
pub fn is_geometry_dump(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Extract and analyze a document.
///
/// Dispatches on file extension:
/// - `.json` → geometry dump
/// - anything else → PDF (requires `pdf` feature / mupdf)
pub fn extract_document(
    path: &Path,
    config: &LayoutConfig,
) -> Result<ExtractedDocument, IngestError> {
    if is_geometry_dump(path) {
        let dump = read_dump(path)?;
        if dump.pages.is_empty() {
            return Err(LayoutError::EmptyDocument.into());
        }
        return Ok(ExtractedDocument {
            analysis: analyze_pages(&dump.pages, config),
            metadata: dump.metadata,
        });
    }
    extract_pdf(path, config)
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path, config: &LayoutConfig) -> Result<ExtractedDocument, IngestError> {
    let backend = pdf_backend(config);
    let analysis = lexgenre_layout::extract_document(path, &backend, config)?;
    Ok(ExtractedDocument {
        analysis,
        metadata: DumpMetadata::default(),
    })
}

#[cfg(feature = "pdf")]
fn pdf_backend(config: &LayoutConfig) -> lexgenre_pdf_mupdf::MupdfBackend {
    lexgenre_pdf_mupdf::MupdfBackend::new()
        .with_header_exclusion(config.header_exclusion().unwrap_or(0.0) as f32)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path, _config: &LayoutConfig) -> Result<ExtractedDocument, IngestError> {
    Err(IngestError::NoPdfSupport)
}
