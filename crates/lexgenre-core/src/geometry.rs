//! Per-page geometry as produced by a [`PageSource`](crate::PageSource).
//!
//! All coordinates are in PDF points relative to the page's top-left corner,
//! with `y` growing downward.

use serde::{Deserialize, Serialize};

/// A straight stroked segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl LineSegment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    pub fn is_finite(&self) -> bool {
        [self.x0, self.x1, self.y0, self.y1]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).abs()
    }

    pub fn mid_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }
}

/// An axis-aligned rectangle. Footnote rules are often drawn as thin filled
/// rectangles rather than stroked lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl RectSegment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn is_finite(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).abs()
    }

    pub fn mid_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }
}

/// One line of extracted text with its vertical extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub top: f64,
    pub bottom: f64,
    pub text: String,
}

impl TextLine {
    pub fn new(top: f64, bottom: f64, text: impl Into<String>) -> Self {
        Self {
            top,
            bottom,
            text: text.into(),
        }
    }

    pub fn mid_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Geometry and text of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub lines: Vec<LineSegment>,
    #[serde(default)]
    pub rects: Vec<RectSegment>,
    /// Raw extracted text of the whole page, possibly empty.
    #[serde(default)]
    pub text: String,
    /// Positioned text lines. When empty the page cannot be cropped and all
    /// of `text` is treated as main text.
    #[serde(default)]
    pub text_lines: Vec<TextLine>,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_line(mut self, line: LineSegment) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_rect(mut self, rect: RectSegment) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn with_text_line(mut self, line: TextLine) -> Self {
        self.text_lines.push(line);
        self
    }

    /// Both dimensions are finite and positive.
    pub fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The page text, rebuilt from positioned lines when no raw text was supplied.
    pub fn full_text(&self) -> String {
        if !self.text.is_empty() || self.text_lines.is_empty() {
            return self.text.clone();
        }
        self.text_lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_prefers_raw_text() {
        let page = PageGeometry::new(612.0, 792.0)
            .with_text("raw")
            .with_text_line(TextLine::new(10.0, 20.0, "positioned"));
        assert_eq!(page.full_text(), "raw");
    }

    #[test]
    fn full_text_falls_back_to_positioned_lines() {
        let page = PageGeometry::new(612.0, 792.0)
            .with_text_line(TextLine::new(10.0, 20.0, "first"))
            .with_text_line(TextLine::new(30.0, 40.0, "second"));
        assert_eq!(page.full_text(), "first\nsecond");
    }

    #[test]
    fn zero_height_page_is_invalid() {
        assert!(!PageGeometry::new(612.0, 0.0).has_valid_size());
        assert!(!PageGeometry::new(f64::NAN, 792.0).has_valid_size());
        assert!(PageGeometry::new(612.0, 792.0).has_valid_size());
    }
}
