use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod authorship;
pub mod backend;
pub mod classifier;
pub mod config_file;
pub mod fallback;
pub mod geometry;
pub mod keywords;
pub mod label;
pub mod length;
pub mod log;
pub mod trace;

// Re-export for convenience
pub use backend::{BackendError, PageSource};
pub use classifier::{ArticleClassifier, ClassifierConfig};
pub use fallback::{PendingFallback, SemanticFallback};
pub use geometry::{LineSegment, PageGeometry, RectSegment, TextLine};
pub use keywords::KeywordCategory;
pub use label::Label;
pub use log::{ClassificationLog, LogEntry};
pub use trace::{ClassificationResult, Evidence, Step, StepDecision, StepTrace};

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Input to the classifier, built once per parsed and unflagged document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    /// Free-text author string as scraped from the landing page.
    pub authors: String,
    pub word_count: usize,
    pub page_count: usize,
    pub main_text: String,
    pub publication_year: i32,
}

/// Data-quality markers that route a document out of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    ScannedPdfDetected,
    LikelyTableOfContents,
    LikelyFrontMatter,
}

impl QualityFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScannedPdfDetected => "scanned_pdf_detected",
            Self::LikelyTableOfContents => "likely_table_of_contents",
            Self::LikelyFrontMatter => "likely_front_matter",
        }
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts and quality flags computed from a segmented document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetrics {
    pub main_words: usize,
    pub footnote_words: usize,
    pub total_words: usize,
    pub total_chars: usize,
    pub non_whitespace_chars: usize,
    pub page_count: usize,
    pub flags: BTreeSet<QualityFlag>,
}

impl DocumentMetrics {
    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Footnote words per main-text word. `None` when the main text is empty.
    pub fn footnote_ratio(&self) -> Option<f64> {
        if self.main_words == 0 {
            None
        } else {
            Some(self.footnote_words as f64 / self.main_words as f64)
        }
    }
}

/// Fields that identify a document in reports, independent of how it was classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIdentity {
    pub title: String,
    pub authors: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<u32>,
}

/// A document routed to manual review before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedItem {
    pub flags: Vec<QualityFlag>,
    pub word_count: usize,
    pub page_count: usize,
    #[serde(flatten)]
    pub identity: DocumentIdentity,
}

impl FlaggedItem {
    pub fn new(metrics: &DocumentMetrics, identity: DocumentIdentity) -> Self {
        Self {
            flags: metrics.flags.iter().copied().collect(),
            word_count: metrics.total_words,
            page_count: metrics.page_count,
            identity,
        }
    }
}

/// A document excluded from a run because it could not be read or analyzed.
///
/// Distinct from the `ERROR` label, which is a classification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub sequence: usize,
    pub path: String,
    pub error: String,
}
