//! End-to-end checks of the classifier's step ordering and outcomes.

use lexgenre_core::{ArticleClassifier, Label, PaperRecord, Step, StepDecision};

fn record(pages: usize, words: usize, main_text: &str, authors: &str, year: i32) -> PaperRecord {
    PaperRecord {
        title: "Untitled".into(),
        authors: authors.into(),
        word_count: words,
        page_count: pages,
        main_text: main_text.into(),
        publication_year: year,
    }
}

fn body_with_header_at(header: &str, offset_chars: usize) -> String {
    let mut text = "x".repeat(offset_chars);
    text.push(' ');
    text.push_str(header);
    text.push(' ');
    text.push_str(&"lorem ipsum ".repeat(500));
    text
}

#[test]
fn two_page_document_is_miscellaneous() {
    let result = ArticleClassifier::new().classify(&record(2, 25_000, "", "", 2004));
    assert_eq!(result.label, Label::Miscellaneous);
    assert_eq!(result.steps.len(), 1);
}

#[test]
fn short_documents_ignore_every_other_signal() {
    let classifier = ArticleClassifier::new();
    for pages in 0..=3 {
        let result = classifier.classify(&record(
            pages,
            9_000,
            "NOTE\nA Student Piece",
            "Jane Doe, J.D. Candidate",
            2004,
        ));
        assert_eq!(result.label, Label::Miscellaneous, "pages = {pages}");
        assert!(result.step(Step::SectionHeaders).is_none());
    }
}

#[test]
fn article_header_confirmed_by_length() {
    let text = body_with_header_at("ARTICLE", 100);
    let result = ArticleClassifier::new().classify(&record(10, 18_000, &text, "", 2004));

    let b = result.step(Step::SectionHeaders).unwrap();
    assert_eq!(b.label_after, Label::Article);
    assert_eq!(b.decision, StepDecision::Assigned);

    assert_eq!(result.label, Label::Article);
    assert!(result.confirmed);
    assert!(!result.requires_manual_review);
}

#[test]
fn header_beyond_search_prefix_is_ignored() {
    // A single 3100-char token keeps the header past the 3000-char cap
    let text = body_with_header_at("ARTICLE", 3_100);
    let result = ArticleClassifier::new().classify(&record(10, 18_000, &text, "", 2004));
    let b = result.step(Step::SectionHeaders).unwrap();
    assert_eq!(b.decision, StepDecision::Continue);
    // Unlabeled, 18000 is not > 18000
    assert_eq!(result.label, Label::Error);
}

#[test]
fn jd_candidate_short_piece_is_comment() {
    let result = ArticleClassifier::new().classify(&record(
        10,
        9_000,
        "Some Title\nBody text",
        "Jane Doe, J.D. Candidate",
        2004,
    ));
    let c = result.step(Step::StudentAuthorship).unwrap();
    assert_eq!(c.label_after, Label::NoteOrComment);
    assert_eq!(result.label, Label::Comment);
}

#[test]
fn class_of_year_student_note() {
    let result = ArticleClassifier::new().classify(&record(
        25,
        14_000,
        "Some Title",
        "John Roe, Class of 2007",
        2006,
    ));
    assert_eq!(result.label, Label::Note);
    assert!(!result.confirmed);
}

#[test]
fn unsupported_pair_goes_to_manual_review() {
    let result = ArticleClassifier::new().classify(&record(
        12,
        16_000,
        "ARTICLE\nNOTE\nTitle",
        "",
        2004,
    ));
    assert_eq!(result.label, Label::Error);
    assert!(result.requires_manual_review);

    let steps: Vec<Step> = result.steps.iter().map(|s| s.step).collect();
    assert_eq!(
        steps,
        vec![
            Step::PreFilter,
            Step::SectionHeaders,
            Step::LengthValidation,
            Step::Escalation
        ]
    );
}

#[test]
fn length_validation_runs_exactly_once() {
    let classifier = ArticleClassifier::new();
    let cases = [
        record(10, 18_000, "ARTICLE", "", 2004),
        record(10, 25_000, "ESSAY", "", 2004),
        record(10, 5_000, "", "", 2004),
        record(10, 12_000, "NOTES COMMENTS", "", 2004),
    ];
    for paper in &cases {
        let result = classifier.classify(paper);
        let count = result
            .steps
            .iter()
            .filter(|s| s.step == Step::LengthValidation)
            .count();
        assert_eq!(count, 1);
    }
}

#[test]
fn classification_is_idempotent() {
    let classifier = ArticleClassifier::new();
    let paper = record(
        14,
        11_000,
        "STUDENT CONTRIBUTION\nTitle",
        "Jane Doe",
        2004,
    );
    let first = classifier.classify(&paper);
    // Classify an unrelated document in between
    let _ = classifier.classify(&record(40, 50_000, "ESSAY", "", 1999));
    let second = classifier.classify(&paper);
    assert_eq!(first, second);
    assert_eq!(first.label, Label::Note);
}

#[test]
fn labels_stay_in_the_closed_set() {
    let classifier = ArticleClassifier::new();
    let headers = ["", "ARTICLE", "ESSAY", "NOTE", "COMMENT", "ARTICLE ESSAY", "NOTE COMMENT"];
    for header in headers {
        for words in [50, 9_999, 10_000, 15_001, 18_001, 20_001] {
            let result = classifier.classify(&record(8, words, header, "", 2004));
            assert!(Label::ALL.contains(&result.label));
            assert_ne!(result.label, Label::Unlabeled);
            if result.label == Label::Error {
                assert!(result.requires_manual_review);
            }
        }
    }
}
