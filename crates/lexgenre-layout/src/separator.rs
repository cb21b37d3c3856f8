//! Footnote separator detection.
//!
//! Law-review typography divides body text from footnotes with a short
//! horizontal rule. It is drawn either as a stroked line or as a thin filled
//! rectangle, so both primitive kinds are considered.

use lexgenre_core::PageGeometry;

use crate::config::LayoutConfig;

/// Result of analysing one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeparatorDetection {
    pub separator_y: Option<f64>,
    /// Primitives that passed the horizontal and span tests.
    pub candidates: usize,
    /// Candidates that also fell inside the vertical band.
    pub in_band: usize,
    /// Primitives dropped for non-finite coordinates.
    pub discarded: usize,
}

impl SeparatorDetection {
    pub fn found(&self) -> bool {
        self.separator_y.is_some()
    }
}

/// Y positions of every horizontal primitive spanning enough of the page,
/// before the vertical band is applied. Returns the positions and the number
/// of primitives discarded as malformed.
pub fn separator_candidates(page: &PageGeometry, config: &LayoutConfig) -> (Vec<f64>, usize) {
    let min_span = page.width * config.min_span_fraction;
    let tol = config.horizontal_tolerance;
    let mut discarded = 0;
    let mut ys = Vec::new();

    for line in &page.lines {
        if !line.is_finite() {
            discarded += 1;
            continue;
        }
        if line.height() < tol && line.width() > min_span {
            ys.push(line.mid_y());
        }
    }
    for rect in &page.rects {
        if !rect.is_finite() {
            discarded += 1;
            continue;
        }
        if rect.height() < tol && rect.width() > min_span {
            ys.push(rect.mid_y());
        }
    }

    (ys, discarded)
}

/// Find the separator on one page.
///
/// Candidates strictly inside `(band_min·H, band_max·H)` are kept and the one
/// closest to `target·H` wins; ties go to the primitive listed first.
pub fn detect_separator(page: &PageGeometry, config: &LayoutConfig) -> SeparatorDetection {
    if !page.has_valid_size() {
        tracing::debug!(
            width = page.width,
            height = page.height,
            "page has no usable size, skipping separator detection"
        );
        return SeparatorDetection {
            discarded: page.lines.len() + page.rects.len(),
            ..Default::default()
        };
    }

    let (candidates, discarded) = separator_candidates(page, config);
    let h = page.height;
    let lo = config.band_min * h;
    let hi = config.band_max * h;
    let target = config.target * h;

    let in_band: Vec<f64> = candidates
        .iter()
        .copied()
        .filter(|&y| y > lo && y < hi)
        .collect();

    let mut best: Option<f64> = None;
    for &y in &in_band {
        match best {
            Some(b) if (b - target).abs() <= (y - target).abs() => {}
            _ => best = Some(y),
        }
    }

    SeparatorDetection {
        separator_y: best,
        candidates: candidates.len(),
        in_band: in_band.len(),
        discarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexgenre_core::{LineSegment, RectSegment};

    const W: f64 = 612.0;
    const H: f64 = 792.0;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn rule(y: f64) -> LineSegment {
        LineSegment::new(72.0, y, 72.0 + W * 0.6, y)
    }

    #[test]
    fn no_primitives_no_separator() {
        let d = detect_separator(&PageGeometry::new(W, H), &config());
        assert!(!d.found());
        assert_eq!(d.candidates, 0);
    }

    #[test]
    fn single_line_in_band() {
        let page = PageGeometry::new(W, H).with_line(rule(500.0));
        let d = detect_separator(&page, &config());
        assert_eq!(d.separator_y, Some(500.0));
    }

    #[test]
    fn picks_candidate_nearest_sixty_percent() {
        // 0.6 * 792 = 475.2
        let page = PageGeometry::new(W, H)
            .with_line(rule(300.0))
            .with_line(rule(480.0))
            .with_line(rule(600.0));
        let d = detect_separator(&page, &config());
        assert_eq!(d.separator_y, Some(480.0));
        assert_eq!(d.in_band, 3);
    }

    #[test]
    fn band_limits_are_exclusive() {
        let lo = 0.2 * H;
        let hi = 0.85 * H;
        let page = PageGeometry::new(W, H).with_line(rule(lo)).with_line(rule(hi));
        let d = detect_separator(&page, &config());
        assert!(!d.found());
        assert_eq!(d.candidates, 2);
        assert_eq!(d.in_band, 0);
    }

    #[test]
    fn header_rule_outside_band_ignored() {
        let page = PageGeometry::new(W, H).with_line(rule(60.0));
        assert!(!detect_separator(&page, &config()).found());
    }

    #[test]
    fn short_lines_are_not_separators() {
        let page = PageGeometry::new(W, H).with_line(LineSegment::new(72.0, 500.0, 200.0, 500.0));
        assert!(!detect_separator(&page, &config()).found());
    }

    #[test]
    fn exactly_half_width_is_not_enough() {
        let page =
            PageGeometry::new(W, H).with_line(LineSegment::new(0.0, 500.0, W / 2.0, 500.0));
        assert!(!detect_separator(&page, &config()).found());
    }

    #[test]
    fn slanted_lines_are_not_horizontal() {
        let page =
            PageGeometry::new(W, H).with_line(LineSegment::new(72.0, 495.0, 540.0, 505.0));
        assert!(!detect_separator(&page, &config()).found());
    }

    #[test]
    fn thin_rectangles_count() {
        let page = PageGeometry::new(W, H).with_rect(RectSegment::new(72.0, 470.0, 540.0, 470.5));
        let d = detect_separator(&page, &config());
        assert_eq!(d.separator_y, Some(470.25));
    }

    #[test]
    fn tall_rectangles_do_not_count() {
        let page = PageGeometry::new(W, H).with_rect(RectSegment::new(72.0, 400.0, 540.0, 520.0));
        assert!(!detect_separator(&page, &config()).found());
    }

    #[test]
    fn malformed_primitives_are_skipped_individually() {
        let page = PageGeometry::new(W, H)
            .with_line(LineSegment::new(f64::NAN, 500.0, 540.0, 500.0))
            .with_rect(RectSegment::new(72.0, f64::INFINITY, 540.0, 470.0))
            .with_line(rule(470.0));
        let d = detect_separator(&page, &config());
        assert_eq!(d.separator_y, Some(470.0));
        assert_eq!(d.discarded, 2);
    }

    #[test]
    fn invalid_page_size_reports_not_found() {
        let page = PageGeometry::new(W, 0.0).with_line(rule(0.0));
        let d = detect_separator(&page, &config());
        assert!(!d.found());
        assert_eq!(d.discarded, 1);
    }

    #[test]
    fn ties_go_to_first_candidate() {
        // 0.6 * 800 = 480, both candidates are 10pt away
        let page = PageGeometry::new(W, 800.0)
            .with_line(rule(470.0))
            .with_line(rule(490.0));
        let d = detect_separator(&page, &config());
        assert_eq!(d.separator_y, Some(470.0));
    }
}
