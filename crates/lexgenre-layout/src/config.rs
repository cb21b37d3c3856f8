use lexgenre_core::config_file::ConfigFile;

use crate::LayoutError;

pub(crate) const DEFAULT_TOC_MARKERS: &[&str] = &["contents", "table of"];
pub(crate) const DEFAULT_FRONT_MATTER_MARKERS: &[&str] =
    &["editor", "foreword", "preface", "introduction to", "note from"];

/// Marker phrases for one quality flag.
///
/// The built-in phrases apply unless `replace` is set; `extra` phrases are
/// added on top either way. Phrases match case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    replace: Option<Vec<String>>,
    extra: Vec<String>,
}

impl MarkerSet {
    pub fn new(replace: Option<Vec<String>>, extra: Vec<String>) -> Self {
        Self { replace, extra }
    }

    /// Effective phrases, lowercased, blanks dropped.
    pub fn resolve(&self, builtin: &[&str]) -> Vec<String> {
        let base: Vec<String> = match &self.replace {
            Some(phrases) => phrases.clone(),
            None => builtin.iter().map(|s| s.to_string()).collect(),
        };
        base.into_iter()
            .chain(self.extra.iter().cloned())
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect()
    }
}

/// Configuration for separator detection, segmentation and metrics.
///
/// Vertical fractions are relative to page height measured from the top edge.
/// Use [`LayoutConfigBuilder`] to construct a validated config.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    // ── separator.rs ──
    /// Candidates must lie strictly below this fraction of the page (default 0.2).
    pub(crate) band_min: f64,
    /// Candidates must lie strictly above this fraction of the page (default 0.85).
    pub(crate) band_max: f64,
    /// The separator closest to this fraction wins (default 0.6).
    pub(crate) target: f64,
    /// Maximum difference between a primitive's y endpoints, in points (default 1.0).
    pub(crate) horizontal_tolerance: f64,
    /// Minimum horizontal span as a fraction of page width (default 0.5).
    pub(crate) min_span_fraction: f64,

    // ── segment.rs ──
    /// Reuse the last detected separator on pages without their own (default false).
    pub(crate) carry_separator: bool,

    // ── page sources ──
    /// Top fraction of each PDF page dropped as running heads (default off).
    pub(crate) header_exclusion: Option<f64>,

    // ── metrics.rs ──
    /// `scanned_pdf_detected` needs more pages than this (default 3).
    pub(crate) scanned_min_pages: usize,
    /// ...and fewer total words than this (default 100).
    pub(crate) scanned_max_words: usize,
    pub(crate) toc_markers: MarkerSet,
    /// Newlines per total word above which text looks like a listing (default 0.3).
    pub(crate) toc_newline_ratio: f64,
    /// `likely_front_matter` needs fewer total words than this (default 800).
    pub(crate) front_matter_max_words: usize,
    pub(crate) front_matter_markers: MarkerSet,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            band_min: 0.2,
            band_max: 0.85,
            target: 0.6,
            horizontal_tolerance: 1.0,
            min_span_fraction: 0.5,
            carry_separator: false,
            header_exclusion: None,
            scanned_min_pages: 3,
            scanned_max_words: 100,
            toc_markers: MarkerSet::default(),
            toc_newline_ratio: 0.3,
            front_matter_max_words: 800,
            front_matter_markers: MarkerSet::default(),
        }
    }
}

impl LayoutConfig {
    pub fn carry_separator(&self) -> bool {
        self.carry_separator
    }

    pub fn header_exclusion(&self) -> Option<f64> {
        self.header_exclusion
    }

    pub(crate) fn toc_markers(&self) -> Vec<String> {
        self.toc_markers.resolve(DEFAULT_TOC_MARKERS)
    }

    pub(crate) fn front_matter_markers(&self) -> Vec<String> {
        self.front_matter_markers
            .resolve(DEFAULT_FRONT_MATTER_MARKERS)
    }
}

/// Builder for [`LayoutConfig`].
///
/// [`build()`](Self::build) fails fast if the band fractions are out of order
/// or outside `0.0..=1.0`.
#[derive(Debug, Clone, Default)]
pub struct LayoutConfigBuilder {
    band_min: Option<f64>,
    band_max: Option<f64>,
    target: Option<f64>,
    horizontal_tolerance: Option<f64>,
    min_span_fraction: Option<f64>,
    carry_separator: Option<bool>,
    header_exclusion: Option<f64>,
    scanned_min_pages: Option<usize>,
    scanned_max_words: Option<usize>,
    toc_markers: MarkerSet,
    toc_newline_ratio: Option<f64>,
    front_matter_max_words: Option<usize>,
    front_matter_markers: MarkerSet,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `[layout]` section of a config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();
        let Some(layout) = file.layout.as_ref() else {
            return builder;
        };
        builder.band_min = layout.band_min;
        builder.band_max = layout.band_max;
        builder.target = layout.target;
        builder.horizontal_tolerance = layout.horizontal_tolerance;
        builder.min_span_fraction = layout.min_span_fraction;
        builder.carry_separator = layout.carry_separator;
        builder.header_exclusion = layout.header_exclusion;
        builder.scanned_min_pages = layout.scanned_min_pages;
        builder.scanned_max_words = layout.scanned_max_words;
        builder.toc_newline_ratio = layout.toc_newline_ratio;
        builder.front_matter_max_words = layout.front_matter_max_words;
        builder.toc_markers = MarkerSet::new(
            layout.toc_markers.clone(),
            layout.extra_toc_markers.clone().unwrap_or_default(),
        );
        builder.front_matter_markers = MarkerSet::new(
            layout.front_matter_markers.clone(),
            layout.extra_front_matter_markers.clone().unwrap_or_default(),
        );
        builder
    }

    // ── Separator band ──

    pub fn band(mut self, min: f64, max: f64) -> Self {
        self.band_min = Some(min);
        self.band_max = Some(max);
        self
    }

    pub fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn horizontal_tolerance(mut self, points: f64) -> Self {
        self.horizontal_tolerance = Some(points);
        self
    }

    pub fn min_span_fraction(mut self, fraction: f64) -> Self {
        self.min_span_fraction = Some(fraction);
        self
    }

    pub fn carry_separator(mut self, carry: bool) -> Self {
        self.carry_separator = Some(carry);
        self
    }

    /// `0.0` turns header exclusion off.
    pub fn header_exclusion(mut self, fraction: f64) -> Self {
        self.header_exclusion = Some(fraction);
        self
    }

    // ── Flags ──

    pub fn scanned_thresholds(mut self, min_pages: usize, max_words: usize) -> Self {
        self.scanned_min_pages = Some(min_pages);
        self.scanned_max_words = Some(max_words);
        self
    }

    pub fn toc_newline_ratio(mut self, ratio: f64) -> Self {
        self.toc_newline_ratio = Some(ratio);
        self
    }

    pub fn front_matter_max_words(mut self, words: usize) -> Self {
        self.front_matter_max_words = Some(words);
        self
    }

    pub fn toc_markers(mut self, markers: MarkerSet) -> Self {
        self.toc_markers = markers;
        self
    }

    pub fn front_matter_markers(mut self, markers: MarkerSet) -> Self {
        self.front_matter_markers = markers;
        self
    }

    pub fn build(self) -> Result<LayoutConfig, LayoutError> {
        let d = LayoutConfig::default();
        let config = LayoutConfig {
            band_min: self.band_min.unwrap_or(d.band_min),
            band_max: self.band_max.unwrap_or(d.band_max),
            target: self.target.unwrap_or(d.target),
            horizontal_tolerance: self.horizontal_tolerance.unwrap_or(d.horizontal_tolerance),
            min_span_fraction: self.min_span_fraction.unwrap_or(d.min_span_fraction),
            carry_separator: self.carry_separator.unwrap_or(d.carry_separator),
            header_exclusion: self.header_exclusion.filter(|f| *f != 0.0),
            scanned_min_pages: self.scanned_min_pages.unwrap_or(d.scanned_min_pages),
            scanned_max_words: self.scanned_max_words.unwrap_or(d.scanned_max_words),
            toc_markers: self.toc_markers,
            toc_newline_ratio: self.toc_newline_ratio.unwrap_or(d.toc_newline_ratio),
            front_matter_max_words: self
                .front_matter_max_words
                .unwrap_or(d.front_matter_max_words),
            front_matter_markers: self.front_matter_markers,
        };

        let unit = 0.0..=1.0;
        for (name, v) in [
            ("band_min", config.band_min),
            ("band_max", config.band_max),
            ("target", config.target),
            ("min_span_fraction", config.min_span_fraction),
            ("header_exclusion", config.header_exclusion.unwrap_or(0.0)),
        ] {
            if !unit.contains(&v) {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be within 0.0..=1.0, got {v}"
                )));
            }
        }
        if config.band_min >= config.band_max {
            return Err(LayoutError::InvalidConfig(format!(
                "band_min ({}) must be below band_max ({})",
                config.band_min, config.band_max
            )));
        }
        for (name, v) in [
            ("horizontal_tolerance", config.horizontal_tolerance),
            ("toc_newline_ratio", config.toc_newline_ratio),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(LayoutError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(config)
    }
}
