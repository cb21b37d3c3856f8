use once_cell::sync::Lazy;
use regex::Regex;

/// Literal marker law reviews append to student author bylines.
pub const JD_CANDIDATE: &str = "J.D. Candidate";

static CLASS_OF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bClass of (\d{4})\b").unwrap());

/// Student-authorship hints found in an author string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentHints {
    pub jd_candidate: bool,
    /// Every `Class of YYYY` year in the string.
    pub class_years: Vec<i32>,
    /// First class year within the window around the publication year.
    pub matching_class_year: Option<i32>,
}

impl StudentHints {
    pub fn is_student(&self) -> bool {
        self.jd_candidate || self.matching_class_year.is_some()
    }
}

/// Scan `authors` for student markers.
///
/// A `Class of YYYY` only counts when `|YYYY - publication_year| <= window`,
/// which filters out alumni bylines on faculty pieces. A negative window
/// matches nothing.
pub fn student_hints(authors: &str, publication_year: i32, window: i32) -> StudentHints {
    let class_years: Vec<i32> = CLASS_OF_RE
        .captures_iter(authors)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect();

    let window = u32::try_from(window).ok();
    let matching_class_year = class_years
        .iter()
        .copied()
        .find(|y| window.is_some_and(|w| y.abs_diff(publication_year) <= w));

    StudentHints {
        jd_candidate: authors.contains(JD_CANDIDATE),
        class_years,
        matching_class_year,
    }
}

/// Rough count of people named in a free-text author string.
///
/// Splits on `;`, ` and `, `&` and on commas that separate names rather than
/// trailing credentials (`Jane Doe, J.D. Candidate` is one author).
pub fn author_count(authors: &str) -> usize {
    static SEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*(?:;|&|\band\b)\s*").unwrap());
    // Whole tokens only: `Sriram` is a name, `Sr.` is a suffix.
    static CREDENTIAL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(concat!(
            r"^(?:",
            r"(?:J\.D\.|LL\.M\.|Ph\.D\.|Jr\.|Sr\.)(?:\s|$)",
            r"|(?:Class of|Professor|Associate|Assistant|Jr|Sr|[A-Z]{2,})\b",
            r")"
        ))
        .unwrap()
    });

    SEP_RE
        .split(authors)
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty() && !CREDENTIAL_RE.is_match(p))
        .count()
}
