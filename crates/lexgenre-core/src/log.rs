//! Append-only record of classification traces for one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::label::Label;
use crate::trace::ClassificationResult;
use crate::{DocumentIdentity, PaperRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the run's input order, which may differ from append order
    /// when documents are ingested in parallel.
    pub sequence: usize,
    pub title: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub word_count: usize,
    pub page_count: usize,
    #[serde(default)]
    pub authors: String,
    pub result: ClassificationResult,
}

/// Log owned by a single classification run.
///
/// Entries can only be appended; there is no way to edit or drop one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationLog {
    pub run_started: DateTime<Utc>,
    entries: Vec<LogEntry>,
}

impl Default for ClassificationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationLog {
    pub fn new() -> Self {
        Self {
            run_started: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Append the result for `paper`. `sequence` is the document's input position.
    pub fn record(
        &mut self,
        sequence: usize,
        paper: &PaperRecord,
        identity: &DocumentIdentity,
        result: ClassificationResult,
    ) -> &LogEntry {
        self.entries.push(LogEntry {
            sequence,
            title: paper.title.clone(),
            year: paper.publication_year,
            source: identity.source.clone(),
            word_count: paper.word_count,
            page_count: paper.page_count,
            authors: paper.authors.clone(),
            result,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose result needs a human decision.
    pub fn needs_review(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.result.requires_manual_review)
    }

    pub fn count_label(&self, label: Label) -> usize {
        self.entries
            .iter()
            .filter(|e| e.result.label == label)
            .count()
    }
}
