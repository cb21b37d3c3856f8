//! Aggregate statistics for one run.

use serde::Serialize;

use lexgenre_core::authorship::author_count;
use lexgenre_core::{ClassificationLog, Label, LogEntry};

pub const DEFAULT_SPLIT_YEAR: i32 = 2005;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: Label,
    pub total: usize,
    pub confirmed: usize,
}

/// Averages over a slice of documents. Averages are `None` for an empty slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    pub documents: usize,
    pub avg_pages: Option<f64>,
    pub avg_words: Option<f64>,
}

impl PeriodStats {
    fn of<'a>(entries: impl Iterator<Item = &'a LogEntry>) -> Self {
        let (mut n, mut pages, mut words) = (0usize, 0usize, 0usize);
        for e in entries {
            n += 1;
            pages += e.page_count;
            words += e.word_count;
        }
        let avg = |total: usize| (n > 0).then(|| total as f64 / n as f64);
        Self {
            documents: n,
            avg_pages: avg(pages),
            avg_words: avg(words),
        }
    }
}

/// Documents published before `year` against those from `year` on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub year: i32,
    pub before: PeriodStats,
    pub after: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub classified: usize,
    pub flagged: usize,
    pub failed: usize,
    pub year_range: Option<(i32, i32)>,
    pub overall: PeriodStats,
    /// Labels that occurred, in label order.
    pub labels: Vec<LabelCount>,
    pub manual_review: usize,
    /// Share of documents with more than one author, `None` when nothing was
    /// classified.
    pub multi_author_share: Option<f64>,
    pub comparison: PeriodComparison,
}

pub fn summarize(
    log: &ClassificationLog,
    flagged: usize,
    failed: usize,
    split_year: i32,
) -> RunSummary {
    let entries = log.entries();

    let year_range = entries
        .iter()
        .map(|e| e.year)
        .fold(None, |acc: Option<(i32, i32)>, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });

    let labels = Label::ALL
        .iter()
        .filter_map(|&label| {
            let matching = entries.iter().filter(|e| e.result.label == label);
            let total = matching.clone().count();
            (total > 0).then(|| LabelCount {
                label,
                total,
                confirmed: matching.filter(|e| e.result.confirmed).count(),
            })
        })
        .collect();

    let multi = entries.iter().filter(|e| author_count(&e.authors) > 1).count();
    let multi_author_share = (!entries.is_empty()).then(|| multi as f64 / entries.len() as f64);

    RunSummary {
        classified: entries.len(),
        flagged,
        failed,
        year_range,
        overall: PeriodStats::of(entries.iter()),
        labels,
        manual_review: log.needs_review().count(),
        multi_author_share,
        comparison: PeriodComparison {
            year: split_year,
            before: PeriodStats::of(entries.iter().filter(|e| e.year < split_year)),
            after: PeriodStats::of(entries.iter().filter(|e| e.year >= split_year)),
        },
    }
}
