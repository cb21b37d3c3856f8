//! Batch manifests listing the documents of a run.
//!
//! ```toml
//! [journal]
//! name = "Duke Law Journal"
//! first_year = 1951
//!
//! [[documents]]
//! path = "pdfs/2004_01.pdf"
//! authors = "Jane Doe, J.D. Candidate"
//! year = 2004
//! ```
//!
//! JSON manifests have the same shape. Relative document paths resolve
//! against the manifest's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::IngestError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalInfo {
    pub name: String,
    /// Year of the first volume, used to derive volume numbers.
    #[serde(default)]
    pub first_year: Option<i32>,
}

/// One document to ingest, plus the metadata the page itself cannot supply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub volume: Option<u32>,
    #[serde(default)]
    pub issue: Option<u32>,
    /// Where the document was obtained, e.g. its URL.
    #[serde(default)]
    pub source: Option<String>,
}

impl ManifestEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub journal: Option<JournalInfo>,
    #[serde(default)]
    pub documents: Vec<ManifestEntry>,
}

/// Volume number for `year` when volumes are numbered one per year from
/// `first_year`. `None` for years before the first volume or out of range.
pub fn volume_for_year(first_year: i32, year: i32) -> Option<u32> {
    let offset = year.checked_sub(first_year)?.checked_add(1)?;
    u32::try_from(offset).ok().filter(|&v| v > 0)
}

impl Manifest {
    /// Fill per-document journal names and volumes from the `[journal]` table
    /// and anchor relative paths at `base_dir`. Explicit entry values win.
    pub fn resolve(&mut self, base_dir: &Path) {
        for entry in &mut self.documents {
            if entry.path.is_relative() {
                entry.path = base_dir.join(&entry.path);
            }
            let Some(journal) = self.journal.as_ref() else {
                continue;
            };
            if entry.journal.is_none() {
                entry.journal = Some(journal.name.clone());
            }
            if entry.volume.is_none()
                && let (Some(first), Some(year)) = (journal.first_year, entry.year)
            {
                entry.volume = volume_for_year(first, year);
            }
        }
    }
}

/// Load a TOML or JSON manifest (chosen by extension, TOML otherwise).
pub fn load_manifest(path: &Path) -> Result<Manifest, IngestError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let mut manifest: Manifest = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    manifest.resolve(base);
    tracing::debug!(
        path = %path.display(),
        documents = manifest.documents.len(),
        "loaded manifest"
    );
    Ok(manifest)
}
