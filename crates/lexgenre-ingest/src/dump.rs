//! JSON page-geometry dumps.
//!
//! A dump is either a bare array of pages or an object with a `pages` array
//! and optional `title`, `authors` and `year`. Each page carries `width`,
//! `height`, `lines`, `rects`, `text` and `text_lines`. Line and rect
//! primitives are objects with `x0`, `top`, `x1`, `bottom` (the layout
//! pdfplumber emits) or 4-element arrays in the same order. Coordinates are
//! measured from the top of the page.
//!
//! Parsing is lenient below the page level: a primitive or text line that is
//! not well formed is dropped and counted, never fatal.

use std::path::Path;

use serde_json::{Map, Value};

use lexgenre_core::{LineSegment, PageGeometry, RectSegment, TextLine};

use crate::IngestError;

/// Document metadata optionally embedded in a dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpMetadata {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct GeometryDump {
    pub metadata: DumpMetadata,
    pub pages: Vec<PageGeometry>,
    /// Primitives and text lines dropped as malformed.
    pub dropped: usize,
}

pub fn read_dump(path: &Path) -> Result<GeometryDump, IngestError> {
    let json = std::fs::read_to_string(path)?;
    let dump = parse_dump(&json)?;
    if dump.dropped > 0 {
        tracing::warn!(
            path = %path.display(),
            dropped = dump.dropped,
            "skipped malformed geometry entries"
        );
    }
    Ok(dump)
}

pub fn parse_dump(json: &str) -> Result<GeometryDump, IngestError> {
    let root: Value = serde_json::from_str(json)?;

    let (pages, metadata) = match &root {
        Value::Array(pages) => (pages, DumpMetadata::default()),
        Value::Object(obj) => {
            let pages = obj
                .get("pages")
                .and_then(Value::as_array)
                .ok_or_else(|| IngestError::InvalidDump("missing `pages` array".into()))?;
            (pages, parse_metadata(obj))
        }
        _ => {
            return Err(IngestError::InvalidDump(
                "expected an object or an array of pages".into(),
            ));
        }
    };

    let mut dump = GeometryDump {
        metadata,
        ..Default::default()
    };
    for (i, page) in pages.iter().enumerate() {
        match page.as_object() {
            Some(obj) => dump.pages.push(parse_page(obj, &mut dump.dropped)),
            None => {
                return Err(IngestError::InvalidDump(format!(
                    "page {} is not an object",
                    i + 1
                )));
            }
        }
    }
    Ok(dump)
}

fn parse_metadata(obj: &Map<String, Value>) -> DumpMetadata {
    let string = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    let year = obj.get("year").and_then(|v| match v {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    DumpMetadata {
        title: string("title"),
        authors: string("authors"),
        year,
    }
}

/// A finite coordinate. Numeric strings are accepted.
fn coord(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// `[x0, top, x1, bottom]`.
fn bounding_box(v: &Value) -> Option<[f64; 4]> {
    match v {
        Value::Array(items) if items.len() == 4 => Some([
            coord(&items[0])?,
            coord(&items[1])?,
            coord(&items[2])?,
            coord(&items[3])?,
        ]),
        Value::Object(o) => Some([
            coord(o.get("x0")?)?,
            coord(o.get("top")?)?,
            coord(o.get("x1")?)?,
            coord(o.get("bottom")?)?,
        ]),
        _ => None,
    }
}

fn text_line(v: &Value) -> Option<TextLine> {
    let o = v.as_object()?;
    Some(TextLine::new(
        coord(o.get("top")?)?,
        coord(o.get("bottom")?)?,
        o.get("text")?.as_str()?,
    ))
}

fn array<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parse_page(obj: &Map<String, Value>, dropped: &mut usize) -> PageGeometry {
    // A missing size leaves the page unusable for separator detection only
    let width = obj.get("width").and_then(coord).unwrap_or(0.0);
    let height = obj.get("height").and_then(coord).unwrap_or(0.0);
    let mut page = PageGeometry::new(width, height);

    for v in array(obj, "lines") {
        match bounding_box(v) {
            Some([x0, top, x1, bottom]) => page.lines.push(LineSegment::new(x0, top, x1, bottom)),
            None => *dropped += 1,
        }
    }
    for v in array(obj, "rects") {
        match bounding_box(v) {
            Some([x0, top, x1, bottom]) => page.rects.push(RectSegment::new(x0, top, x1, bottom)),
            None => *dropped += 1,
        }
    }
    for v in array(obj, "text_lines") {
        match text_line(v) {
            Some(line) => page.text_lines.push(line),
            None => *dropped += 1,
        }
    }
    if let Some(text) = obj.get("text").and_then(Value::as_str) {
        page.text = text.to_string();
    }
    page
}
