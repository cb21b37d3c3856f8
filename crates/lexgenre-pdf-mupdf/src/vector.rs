//! Drawn line and rectangle primitives from the page content stream.
//!
//! MuPDF's structured text carries no vector graphics, so paths are read with
//! `pdf_oxide`. Path coordinates are in PDF user space (origin bottom-left);
//! they are flipped against the page height so `y = 0` is the top edge.

use std::path::Path;

use pdf_oxide::document::PdfDocument;
use pdf_oxide::elements::{PathContent, PathOperation};

use lexgenre_core::{LineSegment, RectSegment};

/// Primitives of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePrimitives {
    pub lines: Vec<LineSegment>,
    pub rects: Vec<RectSegment>,
}

/// Open handle for reading page paths.
pub(crate) struct VectorReader {
    document: PdfDocument,
}

impl VectorReader {
    /// `None` when the file cannot be parsed for vector content. Text
    /// extraction is unaffected; the pages just carry no primitives.
    pub(crate) fn open(path: &Path) -> Option<Self> {
        match PdfDocument::open(path) {
            Ok(document) => Some(Self { document }),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot read vector paths, separators will not be detected"
                );
                None
            }
        }
    }

    pub(crate) fn page(&mut self, index: usize, page_height: f64) -> PagePrimitives {
        match self.document.extract_paths(index) {
            Ok(paths) => primitives_from_paths(&paths, page_height),
            Err(e) => {
                tracing::debug!(page = index + 1, error = %e, "no vector paths for page");
                PagePrimitives::default()
            }
        }
    }
}

/// Flatten painted paths into straight segments and rectangles.
///
/// Curves only move the current point. Paths that are neither stroked nor
/// filled (clipping paths) are skipped; zero-width hairline strokes count.
pub fn primitives_from_paths(paths: &[PathContent], page_height: f64) -> PagePrimitives {
    let flip = |y: f32| page_height - y as f64;
    let mut out = PagePrimitives::default();

    let painted = paths
        .iter()
        .filter(|p| p.stroke_color.is_some() || p.fill_color.is_some());
    for path in painted {
        let mut current: Option<(f32, f32)> = None;
        let mut start: Option<(f32, f32)> = None;

        for op in &path.operations {
            match *op {
                PathOperation::MoveTo(x, y) => {
                    current = Some((x, y));
                    start = current;
                }
                PathOperation::LineTo(x, y) => {
                    if let Some((cx, cy)) = current {
                        out.lines
                            .push(LineSegment::new(cx as f64, flip(cy), x as f64, flip(y)));
                    }
                    current = Some((x, y));
                }
                PathOperation::CurveTo(_, _, _, _, x, y) => {
                    current = Some((x, y));
                }
                PathOperation::Rectangle(x, y, w, h) => {
                    let (x0, x1) = (x.min(x + w) as f64, x.max(x + w) as f64);
                    let (ya, yb) = (flip(y), flip(y + h));
                    out.rects
                        .push(RectSegment::new(x0, ya.min(yb), x1, ya.max(yb)));
                    current = Some((x, y));
                    start = current;
                }
                PathOperation::ClosePath => {
                    if let (Some((cx, cy)), Some((sx, sy))) = (current, start)
                        && (cx, cy) != (sx, sy)
                    {
                        out.lines
                            .push(LineSegment::new(cx as f64, flip(cy), sx as f64, flip(sy)));
                    }
                    current = start;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 792.0;

    #[test]
    fn stroked_rule_becomes_a_top_origin_line() {
        let rule = PathContent::from_operations(vec![
            PathOperation::MoveTo(72.0, 300.0),
            PathOperation::LineTo(400.0, 300.0),
        ]);
        let prims = primitives_from_paths(&[rule], H);
        assert_eq!(prims.lines, vec![LineSegment::new(72.0, 492.0, 400.0, 492.0)]);
        assert!(prims.rects.is_empty());
    }

    #[test]
    fn filled_rule_becomes_a_normalized_rect() {
        // Thin filled box drawn with a negative height
        let rule = PathContent::from_operations(vec![PathOperation::Rectangle(
            72.0, 300.4, 250.0, -0.4,
        )]);
        let prims = primitives_from_paths(&[rule], H);
        assert_eq!(prims.rects.len(), 1);
        let r = prims.rects[0];
        assert_eq!((r.x0, r.x1), (72.0, 322.0));
        assert!(r.y0 < r.y1);
        assert!((r.mid_y() - (H - 300.2)).abs() < 1e-3);
        assert!(r.height() < 1.0);
    }

    #[test]
    fn closed_triangle_yields_three_edges_and_curves_are_skipped() {
        let shape = PathContent::from_operations(vec![
            PathOperation::MoveTo(0.0, 0.0),
            PathOperation::LineTo(10.0, 0.0),
            PathOperation::LineTo(10.0, 10.0),
            PathOperation::ClosePath,
            PathOperation::CurveTo(1.0, 1.0, 2.0, 2.0, 30.0, 30.0),
            PathOperation::LineTo(40.0, 30.0),
        ]);
        let prims = primitives_from_paths(&[shape], H);
        assert_eq!(prims.lines.len(), 4);
        assert_eq!(prims.lines[2], LineSegment::new(10.0, H - 10.0, 0.0, H));
        assert_eq!(prims.lines[3], LineSegment::new(30.0, H - 30.0, 40.0, H - 30.0));
    }

    #[test]
    fn unpainted_paths_are_ignored() {
        let mut clip = PathContent::from_operations(vec![
            PathOperation::MoveTo(0.0, 100.0),
            PathOperation::LineTo(500.0, 100.0),
        ]);
        clip.stroke_color = None;
        clip.fill_color = None;
        assert_eq!(primitives_from_paths(&[clip], H), PagePrimitives::default());
    }
}
