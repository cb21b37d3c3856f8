use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use lexgenre_core::config_file::{self, ConfigFile};
use lexgenre_core::{ArticleClassifier, ClassificationResult, DocumentIdentity, DocumentMetrics};
use lexgenre_ingest::{BatchEvent, DocumentOutcome, DocumentStatus, ManifestEntry};

mod logging;
mod output;
mod settings;

use output::ColorMode;
use settings::{CliOverrides, Settings};

/// Law review genre classifier - split main text from footnotes and label articles
#[derive(Parser, Debug)]
#[command(name = "lexgenre", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Reuse the last detected separator on pages without one
    #[arg(long, global = true)]
    carry_separator: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single PDF or geometry dump
    Classify {
        /// Path to the PDF or `.json` geometry dump
        file_path: PathBuf,

        /// Publication year (required unless the dump carries one)
        #[arg(long)]
        year: Option<i32>,

        /// Author line as printed on the first page
        #[arg(long, default_value = "")]
        authors: String,

        /// Title (defaults to a guess from the first page)
        #[arg(long)]
        title: Option<String>,

        /// Journal name
        #[arg(long)]
        journal: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Print the decision trace
        #[arg(long)]
        trace: bool,

        /// Write output to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show per-page separator detection and document metrics
    Inspect {
        /// Path to the PDF or `.json` geometry dump
        file_path: PathBuf,
    },

    /// Classify every document listed in a manifest and write run reports
    Batch {
        /// TOML or JSON manifest
        manifest: PathBuf,

        /// Directory for the run reports
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Number of documents processed in parallel
        #[arg(long)]
        workers: Option<usize>,

        /// Year splitting the before/after comparison
        #[arg(long)]
        split_year: Option<i32>,
    },

    /// Print the effective configuration
    Config {
        /// Save the effective configuration to the platform config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    let file_config = match cli.config.as_deref() {
        Some(path) => config_file::load_from_path(path).ok_or_else(|| {
            anyhow::anyhow!("could not read config file {}", path.display())
        })?,
        None => config_file::load_config(),
    };

    let mut overrides = CliOverrides {
        carry_separator: cli.carry_separator,
        no_color: cli.no_color,
        ..Default::default()
    };
    if let Command::Batch {
        output_dir,
        workers,
        split_year,
        ..
    } = &cli.command
    {
        overrides.output_dir = output_dir.clone();
        overrides.num_workers = *workers;
        overrides.split_year = *split_year;
    }

    let effective = settings::layered(
        file_config,
        settings::env_overlay(|k| std::env::var(k).ok()),
        overrides.overlay(),
    );
    let settings = Settings::from_config(&effective)?;

    match cli.command {
        Command::Classify {
            file_path,
            year,
            authors,
            title,
            journal,
            json,
            trace,
            output,
        } => {
            let entry = ManifestEntry {
                authors,
                title,
                year,
                journal,
                ..ManifestEntry::new(file_path)
            };
            classify(entry, &settings, json, trace, output)
        }
        Command::Inspect { file_path } => inspect(&file_path, &settings),
        Command::Batch { manifest, .. } => batch(&manifest, &settings).await,
        Command::Config { save } => show_config(&effective, save),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn classifier_for(settings: &Settings) -> ArticleClassifier {
    ArticleClassifier::new().with_config(settings.classifier.clone())
}

#[derive(Serialize)]
struct ClassificationJson<'a> {
    identity: &'a DocumentIdentity,
    metrics: &'a DocumentMetrics,
    result: &'a ClassificationResult,
}

fn classify(
    entry: ManifestEntry,
    settings: &Settings,
    json: bool,
    trace: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !entry.path.exists() {
        anyhow::bail!("File not found: {}", entry.path.display());
    }

    let color = ColorMode(settings.color && output.is_none() && !json);
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    let extracted = lexgenre_ingest::extract_document(&entry.path, &settings.layout)?;
    let outcome =
        lexgenre_ingest::classify_extracted(&entry, extracted, &classifier_for(settings))?;

    match outcome {
        DocumentOutcome::Classified(doc) => {
            if json {
                let body = ClassificationJson {
                    identity: &doc.identity,
                    metrics: &doc.metrics,
                    result: &doc.result,
                };
                writeln!(writer, "{}", serde_json::to_string_pretty(&body)?)?;
            } else {
                output::print_classification(&mut writer, &doc, trace, color)?;
            }
        }
        DocumentOutcome::Flagged(item) => {
            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&item)?)?;
            } else {
                output::print_flagged(&mut writer, &item, color)?;
            }
        }
    }
    Ok(())
}

fn inspect(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let extracted = lexgenre_ingest::extract_document(path, &settings.layout)?;
    let mut stdout = std::io::stdout();
    output::print_inspection(
        &mut stdout,
        &file_name(path),
        &extracted.analysis,
        ColorMode(settings.color),
    )?;
    Ok(())
}

async fn batch(manifest_path: &Path, settings: &Settings) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use owo_colors::OwoColorize;
    use std::time::Duration;

    let manifest = lexgenre_ingest::load_manifest(manifest_path)?;
    if manifest.documents.is_empty() {
        println!("Manifest lists no documents.");
        return Ok(());
    }
    let color = ColorMode(settings.color);
    let total = manifest.documents.len() as u64;

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg} (eta {eta})",
        )?
        .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let cancel = CancellationToken::new();

    // Set up Ctrl+C handler
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let progress = |event: &BatchEvent| {
        bar.set_position(event.completed as u64);
        bar.set_message(file_name(&event.path));
        let note = match event.status {
            DocumentStatus::Failed => Some(format!("failed: {}", event.path.display())),
            DocumentStatus::Flagged => Some(format!("flagged: {}", event.path.display())),
            DocumentStatus::Classified { .. } => None,
        };
        if let Some(note) = note {
            if color.enabled() {
                bar.println(note.yellow().to_string());
            } else {
                bar.println(note);
            }
        }
    };

    let out = lexgenre_ingest::run_batch(
        manifest.documents,
        settings.layout.clone(),
        classifier_for(settings),
        settings.num_workers,
        cancel,
        progress,
    )
    .await;
    bar.finish_and_clear();

    if out.cancelled {
        let msg = format!(
            "Run cancelled: {} of {} documents processed",
            out.processed(),
            total
        );
        if color.enabled() {
            eprintln!("{}", msg.yellow());
        } else {
            eprintln!("{}", msg);
        }
    }

    let mut written = lexgenre_reporting::write_run_reports(
        &settings.output_dir,
        &out.log,
        &out.flagged,
        &out.failures,
    )?;

    let summary = lexgenre_reporting::summarize(
        &out.log,
        out.flagged.len(),
        out.failures.len(),
        settings.split_year,
    );
    let summary_path = settings.output_dir.join("run_summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    written.push(summary_path);

    let mut stdout = std::io::stdout();
    output::print_run_summary(&mut stdout, &summary, color)?;
    writeln!(stdout)?;
    for path in &written {
        writeln!(stdout, "Wrote {}", path.display())?;
    }
    Ok(())
}

fn show_config(effective: &ConfigFile, save: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(effective)?);
    if save {
        let path = config_file::save_config(effective).map_err(|e| anyhow::anyhow!(e))?;
        eprintln!("Saved configuration to {}", path.display());
    }
    Ok(())
}
