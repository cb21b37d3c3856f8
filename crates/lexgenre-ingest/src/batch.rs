//! Parallel processing of a list of documents.
//!
//! Jobs go through an `async_channel` consumed by `num_workers` tasks. Each
//! worker runs the blocking extraction and classification on the blocking
//! pool and sends the outcome to the caller's task, which is the only writer
//! of the [`ClassificationLog`]. Cancelling the token stops workers from
//! taking new jobs; outcomes already produced are still collected.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use lexgenre_core::{ArticleClassifier, ClassificationLog, ExtractionFailure, FlaggedItem, Label};
use lexgenre_layout::LayoutConfig;

use crate::manifest::ManifestEntry;
use crate::pipeline::{DocumentOutcome, process_document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Classified {
        label: Label,
        confirmed: bool,
        manual_review: bool,
    },
    Flagged,
    Failed,
}

/// Emitted once per finished document, in completion order.
#[derive(Debug, Clone)]
pub struct BatchEvent {
    pub sequence: usize,
    pub completed: usize,
    pub total: usize,
    pub path: PathBuf,
    pub status: DocumentStatus,
}

/// Everything a run produced. Flagged items and failures are in input order.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub log: ClassificationLog,
    pub flagged: Vec<FlaggedItem>,
    pub failures: Vec<ExtractionFailure>,
    /// The run was cancelled before every document was processed.
    pub cancelled: bool,
}

impl BatchOutput {
    pub fn processed(&self) -> usize {
        self.log.len() + self.flagged.len() + self.failures.len()
    }
}

type JobResult = (usize, ManifestEntry, Result<DocumentOutcome, String>);

pub async fn run_batch<F>(
    entries: Vec<ManifestEntry>,
    layout: LayoutConfig,
    classifier: ArticleClassifier,
    num_workers: usize,
    cancel: CancellationToken,
    mut progress: F,
) -> BatchOutput
where
    F: FnMut(&BatchEvent),
{
    let total = entries.len();
    let layout = Arc::new(layout);
    let classifier = Arc::new(classifier);

    let (job_tx, job_rx) = async_channel::unbounded::<(usize, ManifestEntry)>();
    for job in entries.into_iter().enumerate() {
        let _ = job_tx.send(job).await;
    }
    job_tx.close();

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<JobResult>();
    let mut workers = Vec::with_capacity(num_workers.max(1));
    for _ in 0..num_workers.max(1) {
        workers.push(tokio::spawn(worker_loop(
            job_rx.clone(),
            result_tx.clone(),
            Arc::clone(&layout),
            Arc::clone(&classifier),
            cancel.clone(),
        )));
    }
    // Workers hold the last clones, so the result channel closes when they exit
    drop(job_rx);
    drop(result_tx);

    let mut output = BatchOutput::default();
    let mut flagged = Vec::new();
    let mut failures = Vec::new();
    let mut completed = 0;

    while let Some((sequence, entry, outcome)) = result_rx.recv().await {
        completed += 1;
        let status = match outcome {
            Ok(DocumentOutcome::Classified(doc)) => {
                let doc = *doc;
                let status = DocumentStatus::Classified {
                    label: doc.result.label,
                    confirmed: doc.result.confirmed,
                    manual_review: doc.result.requires_manual_review,
                };
                output
                    .log
                    .record(sequence, &doc.record, &doc.identity, doc.result);
                status
            }
            Ok(DocumentOutcome::Flagged(item)) => {
                flagged.push((sequence, item));
                DocumentStatus::Flagged
            }
            Err(error) => {
                tracing::warn!(path = %entry.path.display(), %error, "extraction failed");
                failures.push(ExtractionFailure {
                    sequence,
                    path: entry.path.display().to_string(),
                    error,
                });
                DocumentStatus::Failed
            }
        };
        progress(&BatchEvent {
            sequence,
            completed,
            total,
            path: entry.path,
            status,
        });
    }

    for handle in workers {
        let _ = handle.await;
    }

    flagged.sort_by_key(|(seq, _)| *seq);
    output.flagged = flagged.into_iter().map(|(_, item)| item).collect();
    failures.sort_by_key(|f| f.sequence);
    output.failures = failures;
    output.cancelled = completed < total;

    tracing::info!(
        total,
        classified = output.log.len(),
        flagged = output.flagged.len(),
        failed = output.failures.len(),
        cancelled = output.cancelled,
        "batch finished"
    );
    output
}

async fn worker_loop(
    jobs: async_channel::Receiver<(usize, ManifestEntry)>,
    results: mpsc::UnboundedSender<JobResult>,
    layout: Arc<LayoutConfig>,
    classifier: Arc<ArticleClassifier>,
    cancel: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            job = jobs.recv() => job,
        };
        let Ok((sequence, entry)) = job else {
            break;
        };

        let task_entry = entry.clone();
        let layout = Arc::clone(&layout);
        let classifier = Arc::clone(&classifier);
        let outcome = tokio::task::spawn_blocking(move || {
            process_document(&task_entry, &layout, &classifier).map_err(|e| e.to_string())
        })
        .await
        .unwrap_or_else(|e| Err(format!("worker panicked: {e}")));

        if results.send((sequence, entry, outcome)).is_err() {
            break;
        }
    }
}
