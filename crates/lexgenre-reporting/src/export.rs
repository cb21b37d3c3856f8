use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use lexgenre_core::{ClassificationLog, ExtractionFailure, FlaggedItem, LogEntry};

use crate::ReportError;

pub const LOG_JSON: &str = "classification_log.json";
pub const LOG_CSV: &str = "classification_log.csv";
pub const FLAGGED_JSON: &str = "flagged_items.json";
pub const FLAGGED_CSV: &str = "flagged_items.csv";
pub const FAILURES_CSV: &str = "extraction_failures.csv";

fn csv_escape(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// Entries in input order, whatever order they completed in.
fn sorted_entries(log: &ClassificationLog) -> Vec<&LogEntry> {
    let mut entries: Vec<&LogEntry> = log.entries().iter().collect();
    entries.sort_by_key(|e| e.sequence);
    entries
}

/// The full log including every step trace.
pub fn log_to_json(log: &ClassificationLog) -> Result<String, ReportError> {
    #[derive(Serialize)]
    struct Doc<'a> {
        run_started: String,
        entries: Vec<&'a LogEntry>,
    }
    let doc = Doc {
        run_started: log.run_started.to_rfc3339(),
        entries: sorted_entries(log),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// One row per classified document. The trace is reduced to the letters of
/// the steps that ran.
pub fn log_to_csv(log: &ClassificationLog) -> String {
    let mut out = String::from(
        "Sequence,Title,Authors,Year,Source,Pages,Words,Label,Confirmed,ManualReview,Steps,Errors\n",
    );
    for e in sorted_entries(log) {
        let steps: String = e.result.steps.iter().map(|s| s.step.letter()).collect();
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            e.sequence,
            csv_escape(&e.title),
            csv_escape(&e.authors),
            e.year,
            csv_escape(e.source.as_deref().unwrap_or("")),
            e.page_count,
            e.word_count,
            e.result.label,
            e.result.confirmed,
            e.result.requires_manual_review,
            steps,
            csv_escape(&e.result.errors.join("; ")),
        ));
    }
    out
}

pub fn flagged_to_json(items: &[FlaggedItem]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(items)?)
}

pub fn flagged_to_csv(items: &[FlaggedItem]) -> String {
    let mut out =
        String::from("Title,Authors,Year,Journal,Volume,Issue,Source,Pages,Words,Flags\n");
    for item in items {
        let id = &item.identity;
        let flags: Vec<&str> = item.flags.iter().map(|f| f.as_str()).collect();
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            csv_escape(&id.title),
            csv_escape(&id.authors),
            id.year,
            csv_escape(id.journal.as_deref().unwrap_or("")),
            opt(id.volume),
            opt(id.issue),
            csv_escape(id.source.as_deref().unwrap_or("")),
            item.page_count,
            item.word_count,
            flags.join(";"),
        ));
    }
    out
}

pub fn failures_to_csv(failures: &[ExtractionFailure]) -> String {
    let mut sorted: Vec<&ExtractionFailure> = failures.iter().collect();
    sorted.sort_by_key(|f| f.sequence);
    let mut out = String::from("Sequence,Path,Error\n");
    for f in sorted {
        out.push_str(&format!(
            "{},{},{}\n",
            f.sequence,
            csv_escape(&f.path),
            csv_escape(&f.error)
        ));
    }
    out
}

fn write_file(path: &Path, content: &str) -> Result<(), ReportError> {
    let mut file = std::fs::File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Write every report for a run into `dir`, creating it if needed.
///
/// The log files are always written. Flagged items and failures are only
/// written when there are any. Returns the paths written.
pub fn write_run_reports(
    dir: &Path,
    log: &ClassificationLog,
    flagged: &[FlaggedItem],
    failures: &[ExtractionFailure],
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<(&str, String)> =
        vec![(LOG_JSON, log_to_json(log)?), (LOG_CSV, log_to_csv(log))];
    if !flagged.is_empty() {
        files.push((FLAGGED_JSON, flagged_to_json(flagged)?));
        files.push((FLAGGED_CSV, flagged_to_csv(flagged)));
    }
    if !failures.is_empty() {
        files.push((FAILURES_CSV, failures_to_csv(failures)));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        write_file(&path, &content)?;
        written.push(path);
    }
    tracing::info!(dir = %dir.display(), files = written.len(), "wrote run reports");
    Ok(written)
}
