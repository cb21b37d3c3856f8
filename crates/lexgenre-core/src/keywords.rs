//! Section-header keyword lookup (step B).
//!
//! Law reviews print the section a piece belongs to (`ARTICLE`, `NOTE`, ...)
//! in capitals near the top of its first page. Matching is case-sensitive so
//! prose occurrences of "note" or "article" are ignored.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::label::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeywordCategory {
    Article,
    Essay,
    Note,
    Comment,
    StudentContribution,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Article,
        KeywordCategory::Essay,
        KeywordCategory::Note,
        KeywordCategory::Comment,
        KeywordCategory::StudentContribution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "ARTICLE",
            Self::Essay => "ESSAY",
            Self::Note => "NOTE",
            Self::Comment => "COMMENT",
            Self::StudentContribution => "STUDENT_CONTRIBUTION",
        }
    }

    /// Header tokens for this category, singular and plural.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Article => &["ARTICLE", "ARTICLES"],
            Self::Essay => &["ESSAY", "ESSAYS"],
            Self::Note => &["NOTE", "NOTES"],
            Self::Comment => &["COMMENT", "COMMENTS"],
            Self::StudentContribution => &["STUDENT CONTRIBUTION", "STUDENT CONTRIBUTIONS"],
        }
    }

    /// Label implied when this is the only category found.
    pub fn direct_label(&self) -> Label {
        match self {
            Self::Article => Label::Article,
            Self::Essay => Label::Essay,
            Self::Note => Label::Note,
            Self::Comment => Label::Comment,
            Self::StudentContribution => Label::NoteOrComment,
        }
    }

    fn pattern(&self) -> &'static Regex {
        static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
            KeywordCategory::ALL
                .iter()
                .map(|c| {
                    let alternatives: Vec<String> = c
                        .tokens()
                        .iter()
                        .map(|t| regex::escape(t).replace(' ', r"\s+"))
                        .collect();
                    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).unwrap()
                })
                .collect()
        });
        &PATTERNS[*self as usize]
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of step B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordDecision {
    /// No header found; fall through to the authorship check.
    Continue,
    Label(Label),
}

/// The leading part of the text searched for headers: at most `max_words`
/// words and never more than `max_chars` characters.
pub fn search_prefix(text: &str, max_words: usize, max_chars: usize) -> &str {
    if max_words == 0 {
        return "";
    }

    let mut end = text.len();
    let mut seen = 0;
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                in_word = false;
                if seen == max_words {
                    end = i;
                    break;
                }
            }
        } else if !in_word {
            in_word = true;
            seen += 1;
        }
    }

    if let Some((i, _)) = text[..end].char_indices().nth(max_chars) {
        end = i;
    }
    &text[..end]
}

/// Categories whose header tokens occur in `prefix`.
pub fn find_categories(prefix: &str) -> BTreeSet<KeywordCategory> {
    KeywordCategory::ALL
        .iter()
        .copied()
        .filter(|c| c.pattern().is_match(prefix))
        .collect()
}

/// Map the set of categories found to a decision.
pub fn decide(found: &BTreeSet<KeywordCategory>) -> KeywordDecision {
    use KeywordCategory::*;

    let cats: Vec<KeywordCategory> = found.iter().copied().collect();
    match cats.as_slice() {
        [] => KeywordDecision::Continue,
        [only] => KeywordDecision::Label(only.direct_label()),
        [Article, Essay] => KeywordDecision::Label(Label::ArticleOrEssay),
        [Note, Comment] => KeywordDecision::Label(Label::NoteOrComment),
        _ => KeywordDecision::Label(Label::Error),
    }
}
