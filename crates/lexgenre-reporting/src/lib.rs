use std::path::PathBuf;

use thiserror::Error;

pub mod export;
pub mod summary;

pub use export::{
    failures_to_csv, flagged_to_csv, flagged_to_json, log_to_csv, log_to_json,
    write_run_reports,
};
pub use summary::{
    DEFAULT_SPLIT_YEAR, LabelCount, PeriodComparison, PeriodStats, RunSummary, summarize,
};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
