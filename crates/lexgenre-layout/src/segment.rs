//! Main-text / footnote-text segmentation across a whole document.

use lexgenre_core::PageGeometry;

use crate::config::LayoutConfig;
use crate::separator::detect_separator;

/// What happened on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// 1-based page number.
    pub page_number: usize,
    /// Whether this page's own geometry yielded a separator.
    pub found: bool,
    /// Separator used to split the page, which is a previous page's when
    /// `carried` is set.
    pub separator_y: Option<f64>,
    pub carried: bool,
    /// The page text was split by position. `false` when no separator was
    /// used or the page had no positioned text lines.
    pub cropped: bool,
    pub discarded_primitives: usize,
}

/// Main and footnote text accumulated over all pages in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentedDocument {
    pub pages: Vec<PageOutcome>,
    pub main_text: String,
    pub footnote_text: String,
}

impl SegmentedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages_with_separator(&self) -> usize {
        self.pages.iter().filter(|p| p.separator_y.is_some()).count()
    }

    /// `main_text + " " + footnote_text`.
    pub fn combined_text(&self) -> String {
        let mut out = String::with_capacity(self.main_text.len() + self.footnote_text.len() + 1);
        out.push_str(&self.main_text);
        out.push(' ');
        out.push_str(&self.footnote_text);
        out
    }
}

/// Append `piece` to `buf`, separated by a single space.
fn append_spaced(buf: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(piece);
}

/// Split a page's text at `separator_y`.
///
/// Lines whose vertical midpoint lies above the separator are main text; the
/// rest are footnotes. Returns `None` when the page has no positioned lines.
pub fn split_page(page: &PageGeometry, separator_y: f64) -> Option<(String, String)> {
    if page.text_lines.is_empty() {
        return None;
    }
    let mut main = Vec::new();
    let mut foot = Vec::new();
    for line in &page.text_lines {
        if line.mid_y() < separator_y {
            main.push(line.text.as_str());
        } else {
            foot.push(line.text.as_str());
        }
    }
    Some((main.join("\n"), foot.join("\n")))
}

/// Segment every page and accumulate the two text streams.
///
/// Separators are detected per page. With `carry_separator` enabled, a page
/// without its own separator reuses the last one found on an earlier page;
/// otherwise such a page contributes only main text.
pub fn segment_document(pages: &[PageGeometry], config: &LayoutConfig) -> SegmentedDocument {
    let mut doc = SegmentedDocument::default();
    let mut last_separator: Option<f64> = None;

    for (i, page) in pages.iter().enumerate() {
        let detection = detect_separator(page, config);
        let found = detection.found();

        let (separator_y, carried) = match detection.separator_y {
            Some(y) => {
                last_separator = Some(y);
                (Some(y), false)
            }
            None if config.carry_separator && page.has_valid_size() => {
                (last_separator, last_separator.is_some())
            }
            None => (None, false),
        };

        let split = separator_y.and_then(|y| split_page(page, y));
        let cropped = split.is_some();
        match split {
            Some((main, foot)) => {
                append_spaced(&mut doc.main_text, &main);
                append_spaced(&mut doc.footnote_text, &foot);
            }
            None => {
                if separator_y.is_some() {
                    tracing::debug!(
                        page = i + 1,
                        "separator found but page has no positioned text, keeping all as main text"
                    );
                }
                append_spaced(&mut doc.main_text, &page.full_text());
            }
        }

        tracing::trace!(
            page = i + 1,
            found,
            carried,
            separator_y = ?separator_y,
            candidates = detection.candidates,
            "segmented page"
        );

        doc.pages.push(PageOutcome {
            page_number: i + 1,
            found,
            separator_y,
            carried,
            cropped,
            discarded_primitives: detection.discarded,
        });
    }

    doc
}
