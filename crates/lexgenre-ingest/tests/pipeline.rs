//! Geometry dumps through extraction, the quality gate and the classifier.

use std::path::Path;

use serde_json::{Value, json};

use lexgenre_core::{ArticleClassifier, Label, QualityFlag};
use lexgenre_ingest::{DocumentOutcome, IngestError, ManifestEntry, process_document};
use lexgenre_layout::{LayoutConfig, LayoutError};

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

/// A letter-size page with a footnote rule at y = 480.
fn page(body: &str, footnote: &str) -> Value {
    json!({
        "width": 612,
        "height": 792,
        "lines": [{"x0": 72, "top": 480, "x1": 400, "bottom": 480}],
        "text_lines": [
            {"top": 100, "bottom": 110, "text": body},
            {"top": 500, "bottom": 510, "text": footnote}
        ]
    })
}

fn write_dump(dir: &Path, name: &str, dump: Value) -> ManifestEntry {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&dump).unwrap()).unwrap();
    ManifestEntry::new(path)
}

#[test]
fn long_article_is_confirmed() {
    let dir = tempfile::tempdir().unwrap();
    let mut pages = vec![page(&format!("ARTICLE\n{}", words(1_900)), &words(100))];
    for _ in 1..10 {
        pages.push(page(&words(1_900), &words(100)));
    }
    let mut entry = write_dump(
        dir.path(),
        "article.json",
        json!({"title": "On Standing", "pages": pages}),
    );
    entry.year = Some(2004);
    entry.authors = "Jane Doe".into();

    let outcome =
        process_document(&entry, &LayoutConfig::default(), &ArticleClassifier::new()).unwrap();
    let DocumentOutcome::Classified(doc) = outcome else {
        panic!("expected a classified document");
    };
    assert_eq!(doc.metrics.main_words, 19_001);
    assert_eq!(doc.metrics.footnote_words, 1_000);
    assert_eq!(doc.record.word_count, 20_001);
    assert_eq!(doc.identity.title, "On Standing");
    assert_eq!(doc.result.label, Label::Article);
    assert!(doc.result.confirmed);
}

#[test]
fn near_empty_pages_are_flagged_not_classified() {
    let dir = tempfile::tempdir().unwrap();
    let pages: Vec<Value> = (0..6).map(|_| page("", "")).collect();
    let entry = write_dump(
        dir.path(),
        "scan.json",
        json!({"year": 1998, "authors": "A. Author", "pages": pages}),
    );

    let outcome =
        process_document(&entry, &LayoutConfig::default(), &ArticleClassifier::new()).unwrap();
    let DocumentOutcome::Flagged(item) = outcome else {
        panic!("expected a flagged document");
    };
    assert_eq!(item.flags, vec![QualityFlag::ScannedPdfDetected]);
    assert_eq!(item.page_count, 6);
    assert_eq!(item.identity.year, 1998);
    assert_eq!(item.identity.authors, "A. Author");
}

#[test]
fn title_falls_back_to_first_page_guess() {
    let dir = tempfile::tempdir().unwrap();
    let first = json!({
        "width": 612, "height": 792,
        "text": "DUKE LAW JOURNAL\nA Theory of Judicial Minimalism\nJohn Roe"
    });
    let mut pages = vec![first];
    for _ in 0..4 {
        pages.push(page(&words(500), &words(50)));
    }
    let mut entry = write_dump(dir.path(), "untitled.json", json!({"pages": pages}));
    entry.year = Some(2010);

    let outcome =
        process_document(&entry, &LayoutConfig::default(), &ArticleClassifier::new()).unwrap();
    let DocumentOutcome::Classified(doc) = outcome else {
        panic!("expected a classified document");
    };
    assert_eq!(doc.identity.title, "A Theory of Judicial Minimalism");
}

#[test]
fn missing_year_is_an_extraction_failure() {
    let dir = tempfile::tempdir().unwrap();
    let entry = write_dump(dir.path(), "noyear.json", json!([page("text", "")]));
    let err = process_document(&entry, &LayoutConfig::default(), &ArticleClassifier::new())
        .unwrap_err();
    assert!(matches!(err, IngestError::MissingYear(_)));
}

#[test]
fn dump_without_pages_is_an_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut entry = write_dump(dir.path(), "empty.json", json!({"pages": []}));
    entry.year = Some(2000);
    let err = process_document(&entry, &LayoutConfig::default(), &ArticleClassifier::new())
        .unwrap_err();
    assert!(matches!(err, IngestError::Layout(LayoutError::EmptyDocument)));
}

#[test]
fn unreadable_file_is_an_io_error() {
    let mut entry = ManifestEntry::new("/nonexistent/lexgenre/doc.json");
    entry.year = Some(2000);
    let err = process_document(&entry, &LayoutConfig::default(), &ArticleClassifier::new())
        .unwrap_err();
    assert!(matches!(err, IngestError::Io(_)));
}
