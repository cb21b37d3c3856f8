use std::path::Path;

use mupdf::{Document, TextPageFlags};

use lexgenre_core::{BackendError, PageGeometry, PageSource, TextLine};

mod vector;

pub use vector::{PagePrimitives, primitives_from_paths};

use vector::VectorReader;

/// MuPDF-based implementation of [`PageSource`].
///
/// This crate is the sole AGPL island. It isolates the mupdf dependency so
/// that geometry-dump inputs do not transitively depend on it.
///
/// Text lines come from MuPDF's structured text. Drawn lines and rectangles
/// come from the content stream paths (see [`primitives_from_paths`]); when
/// those cannot be read the pages carry text only. Coordinates are shifted
/// so that `y = 0` is the top edge of the page.
#[derive(Debug, Clone, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from the top whose blocks are dropped.
    /// `None` keeps everything.
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop running heads in the top `ratio` of each page. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    pub fn header_exclusion(&self) -> Option<f32> {
        self.header_exclusion_ratio
    }
}

fn extraction(e: impl ToString) -> BackendError {
    BackendError::ExtractionError(e.to_string())
}

impl PageSource for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageGeometry>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut vectors = VectorReader::open(path);
        let mut pages = Vec::new();

        for (index, page_result) in document.pages().map_err(extraction)?.enumerate() {
            let page = page_result.map_err(extraction)?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(extraction)?;

            let bounds = page.bounds().map_err(extraction)?;
            let origin_y = bounds.y0;
            let width = (bounds.x1 - bounds.x0) as f64;
            let height = (bounds.y1 - bounds.y0) as f64;

            let header_threshold = self
                .header_exclusion_ratio
                .map(|r| bounds.y0 + (bounds.y1 - bounds.y0) * r);

            let mut geometry = PageGeometry::new(width, height);
            let mut raw = String::new();

            for block in text_page.blocks() {
                if let Some(threshold) = header_threshold
                    && block.bounds().y1 <= threshold
                {
                    continue;
                }

                for line in block.lines() {
                    let text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    let line_bounds = line.bounds();
                    raw.push_str(&text);
                    raw.push('\n');
                    geometry.text_lines.push(TextLine::new(
                        (line_bounds.y0 - origin_y) as f64,
                        (line_bounds.y1 - origin_y) as f64,
                        text,
                    ));
                }
            }

            geometry.text = raw;

            let primitives = vectors
                .as_mut()
                .map(|v| v.page(index, height))
                .unwrap_or_default();
            geometry.lines = primitives.lines;
            geometry.rects = primitives.rects;

            pages.push(geometry);
        }

        tracing::debug!(path = %path.display(), pages = pages.len(), "extracted pages with mupdf");
        Ok(pages)
    }
}
