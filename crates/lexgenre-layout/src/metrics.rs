//! Word and character counts plus data-quality flags.

use std::collections::BTreeSet;

use lexgenre_core::{DocumentMetrics, QualityFlag, word_count};

use crate::config::LayoutConfig;
use crate::segment::SegmentedDocument;

/// Compute counts and flags for a segmented document.
///
/// Total words are counted over `main + " " + footnotes`, so they always equal
/// `main_words + footnote_words`. Flags look at the main text only.
pub fn compute_metrics(doc: &SegmentedDocument, config: &LayoutConfig) -> DocumentMetrics {
    let combined = doc.combined_text();
    let main_words = word_count(&doc.main_text);
    let footnote_words = word_count(&doc.footnote_text);
    let total_words = word_count(&combined);

    let mut metrics = DocumentMetrics {
        main_words,
        footnote_words,
        total_words,
        total_chars: combined.chars().count(),
        non_whitespace_chars: combined.chars().filter(|c| !c.is_whitespace()).count(),
        page_count: doc.page_count(),
        flags: BTreeSet::new(),
    };
    metrics.flags = quality_flags(&doc.main_text, &metrics, config);

    if metrics.is_flagged() {
        tracing::debug!(
            flags = ?metrics.flags,
            pages = metrics.page_count,
            words = metrics.total_words,
            "document flagged"
        );
    }
    metrics
}

fn contains_any(haystack: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|m| !m.is_empty() && haystack.contains(&m.to_lowercase()))
}

/// Derive the quality flags from the main text and already computed counts.
pub fn quality_flags(
    main_text: &str,
    metrics: &DocumentMetrics,
    config: &LayoutConfig,
) -> BTreeSet<QualityFlag> {
    let mut flags = BTreeSet::new();
    let lower = main_text.to_lowercase();

    if metrics.page_count > config.scanned_min_pages
        && metrics.total_words < config.scanned_max_words
    {
        flags.insert(QualityFlag::ScannedPdfDetected);
    }

    let newlines = main_text.matches('\n').count();
    if contains_any(&lower, &config.toc_markers())
        && newlines as f64 > config.toc_newline_ratio * metrics.total_words as f64
    {
        flags.insert(QualityFlag::LikelyTableOfContents);
    }

    if metrics.total_words < config.front_matter_max_words
        && contains_any(&lower, &config.front_matter_markers())
    {
        flags.insert(QualityFlag::LikelyFrontMatter);
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::PageOutcome;

    fn doc(pages: usize, main: &str, foot: &str) -> SegmentedDocument {
        SegmentedDocument {
            pages: (1..=pages)
                .map(|n| PageOutcome {
                    page_number: n,
                    found: false,
                    separator_y: None,
                    carried: false,
                    cropped: false,
                    discarded_primitives: 0,
                })
                .collect(),
            main_text: main.to_string(),
            footnote_text: foot.to_string(),
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn counts_cover_both_streams() {
        let m = compute_metrics(&doc(1, "one two\nthree", "four"), &LayoutConfig::default());
        assert_eq!(m.main_words, 3);
        assert_eq!(m.footnote_words, 1);
        assert_eq!(m.total_words, 4);
        // "one two\nthree four"
        assert_eq!(m.total_chars, 18);
        assert_eq!(m.non_whitespace_chars, 15);
        assert_eq!(m.page_count, 1);
    }

    #[test]
    fn many_pages_no_text_is_scanned() {
        let m = compute_metrics(&doc(12, &words(40), ""), &LayoutConfig::default());
        assert!(m.flags.contains(&QualityFlag::ScannedPdfDetected));
    }

    #[test]
    fn three_pages_is_never_scanned() {
        let m = compute_metrics(&doc(3, "", ""), &LayoutConfig::default());
        assert!(!m.flags.contains(&QualityFlag::ScannedPdfDetected));
    }

    #[test]
    fn twenty_pages_four_hundred_words_is_not_scanned() {
        let m = compute_metrics(&doc(20, &words(400), ""), &LayoutConfig::default());
        assert_eq!(m.total_words, 400);
        assert!(m.flags.is_empty());
    }

    #[test]
    fn table_of_contents_needs_marker_and_line_density() {
        let toc = "TABLE OF CONTENTS\nArticles 1\nNotes 45\nComments 80\nIndex 99";
        let m = compute_metrics(&doc(5, toc, ""), &LayoutConfig::default());
        assert!(m.flags.contains(&QualityFlag::LikelyTableOfContents));

        // Same marker in running prose
        let prose = format!("the contents of the record show {}", words(200));
        let m = compute_metrics(&doc(5, &prose, ""), &LayoutConfig::default());
        assert!(!m.flags.contains(&QualityFlag::LikelyTableOfContents));
    }

    #[test]
    fn short_editorial_text_is_front_matter() {
        let text = format!("A Note from the Editor\n{}", words(300));
        let m = compute_metrics(&doc(4, &text, ""), &LayoutConfig::default());
        assert!(m.flags.contains(&QualityFlag::LikelyFrontMatter));
    }

    #[test]
    fn long_text_with_marker_is_not_front_matter() {
        let text = format!("Foreword {}", words(5_000));
        let m = compute_metrics(&doc(30, &text, ""), &LayoutConfig::default());
        assert!(m.flags.is_empty());
    }

    #[test]
    fn footnote_markers_do_not_flag() {
        let m = compute_metrics(
            &doc(6, &words(300), "1. Letter from the editor."),
            &LayoutConfig::default(),
        );
        assert!(!m.flags.contains(&QualityFlag::LikelyFrontMatter));
    }

    #[test]
    fn configured_thresholds_and_markers_apply() {
        use crate::config::{LayoutConfigBuilder, MarkerSet};

        let config = LayoutConfigBuilder::new()
            .scanned_thresholds(10, 100)
            .toc_markers(MarkerSet::new(Some(vec!["Index".into()]), Vec::new()))
            .front_matter_max_words(100)
            .build()
            .unwrap();

        // Scanned under the default page threshold
        let m = compute_metrics(&doc(8, &words(40), ""), &config);
        assert!(!m.flags.contains(&QualityFlag::ScannedPdfDetected));

        let listing = "INDEX\nAdams 4\nBrown 9\nClark 12";
        let m = compute_metrics(&doc(2, listing, ""), &config);
        assert!(m.flags.contains(&QualityFlag::LikelyTableOfContents));

        let toc = "TABLE OF CONTENTS\nArticles 1\nNotes 45";
        let m = compute_metrics(&doc(2, toc, ""), &config);
        assert!(!m.flags.contains(&QualityFlag::LikelyTableOfContents));

        let editorial = format!("A Note from the Editor\n{}", words(300));
        let m = compute_metrics(&doc(4, &editorial, ""), &config);
        assert!(!m.flags.contains(&QualityFlag::LikelyFrontMatter));
    }
}
