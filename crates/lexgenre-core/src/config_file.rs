use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub layout: Option<LayoutSection>,
    pub classifier: Option<ClassifierSection>,
    pub run: Option<RunSection>,
    pub display: Option<DisplaySection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSection {
    pub band_min: Option<f64>,
    pub band_max: Option<f64>,
    pub target: Option<f64>,
    pub horizontal_tolerance: Option<f64>,
    pub min_span_fraction: Option<f64>,
    pub carry_separator: Option<bool>,
    /// Fraction of page height at the top whose text blocks are dropped from PDFs.
    pub header_exclusion: Option<f64>,
    pub scanned_min_pages: Option<usize>,
    pub scanned_max_words: Option<usize>,
    pub toc_newline_ratio: Option<f64>,
    pub front_matter_max_words: Option<usize>,
    /// Replaces the built-in table-of-contents markers.
    pub toc_markers: Option<Vec<String>>,
    /// Added to the (possibly replaced) table-of-contents markers.
    pub extra_toc_markers: Option<Vec<String>>,
    pub front_matter_markers: Option<Vec<String>>,
    pub extra_front_matter_markers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierSection {
    pub max_misc_pages: Option<usize>,
    pub keyword_prefix_words: Option<usize>,
    pub keyword_prefix_chars: Option<usize>,
    pub student_max_words: Option<usize>,
    pub class_year_window: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSection {
    pub output_dir: Option<String>,
    pub num_workers: Option<usize>,
    pub split_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySection {
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/lexgenre/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lexgenre").join("config.toml"))
}

/// Load config by cascading CWD `.lexgenre.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".lexgenre.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

fn pick<S, T: Clone>(
    overlay: &Option<S>,
    base: &Option<S>,
    field: impl Fn(&S) -> &Option<T>,
) -> Option<T> {
    overlay
        .as_ref()
        .and_then(|s| field(s).clone())
        .or_else(|| base.as_ref().and_then(|s| field(s).clone()))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        layout: Some(LayoutSection {
            band_min: pick(&overlay.layout, &base.layout, |l| &l.band_min),
            band_max: pick(&overlay.layout, &base.layout, |l| &l.band_max),
            target: pick(&overlay.layout, &base.layout, |l| &l.target),
            horizontal_tolerance: pick(&overlay.layout, &base.layout, |l| {
                &l.horizontal_tolerance
            }),
            min_span_fraction: pick(&overlay.layout, &base.layout, |l| &l.min_span_fraction),
            carry_separator: pick(&overlay.layout, &base.layout, |l| &l.carry_separator),
            header_exclusion: pick(&overlay.layout, &base.layout, |l| &l.header_exclusion),
            scanned_min_pages: pick(&overlay.layout, &base.layout, |l| &l.scanned_min_pages),
            scanned_max_words: pick(&overlay.layout, &base.layout, |l| &l.scanned_max_words),
            toc_newline_ratio: pick(&overlay.layout, &base.layout, |l| &l.toc_newline_ratio),
            front_matter_max_words: pick(&overlay.layout, &base.layout, |l| {
                &l.front_matter_max_words
            }),
            toc_markers: pick(&overlay.layout, &base.layout, |l| &l.toc_markers),
            extra_toc_markers: pick(&overlay.layout, &base.layout, |l| &l.extra_toc_markers),
            front_matter_markers: pick(&overlay.layout, &base.layout, |l| {
                &l.front_matter_markers
            }),
            extra_front_matter_markers: pick(&overlay.layout, &base.layout, |l| {
                &l.extra_front_matter_markers
            }),
        }),
        classifier: Some(ClassifierSection {
            max_misc_pages: pick(&overlay.classifier, &base.classifier, |c| {
                &c.max_misc_pages
            }),
            keyword_prefix_words: pick(&overlay.classifier, &base.classifier, |c| {
                &c.keyword_prefix_words
            }),
            keyword_prefix_chars: pick(&overlay.classifier, &base.classifier, |c| {
                &c.keyword_prefix_chars
            }),
            student_max_words: pick(&overlay.classifier, &base.classifier, |c| {
                &c.student_max_words
            }),
            class_year_window: pick(&overlay.classifier, &base.classifier, |c| {
                &c.class_year_window
            }),
        }),
        run: Some(RunSection {
            output_dir: pick(&overlay.run, &base.run, |r| &r.output_dir),
            num_workers: pick(&overlay.run, &base.run, |r| &r.num_workers),
            split_year: pick(&overlay.run, &base.run, |r| &r.split_year),
        }),
        display: Some(DisplaySection {
            color: pick(&overlay.display, &base.display, |d| &d.color),
        }),
    }
}

impl ConfigFile {
    /// Classifier settings with file values applied over the defaults.
    pub fn classifier_config(&self) -> ClassifierConfig {
        let defaults = ClassifierConfig::default();
        let Some(c) = self.classifier.as_ref() else {
            return defaults;
        };
        ClassifierConfig {
            max_misc_pages: c.max_misc_pages.unwrap_or(defaults.max_misc_pages),
            keyword_prefix_words: c
                .keyword_prefix_words
                .unwrap_or(defaults.keyword_prefix_words),
            keyword_prefix_chars: c
                .keyword_prefix_chars
                .unwrap_or(defaults.keyword_prefix_chars),
            student_max_words: c.student_max_words.unwrap_or(defaults.student_max_words),
            class_year_window: c.class_year_window.unwrap_or(defaults.class_year_window),
        }
    }
}

/// Save config to the platform config path.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
