//! Length-based validation table (step D).
//!
//! Each provisional label maps to a word-count rule. The table is a closed
//! match over [`Label`], so adding a label forces a decision here.

use std::fmt;

use crate::label::Label;

/// A label with its confirmed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub label: Label,
    pub confirmed: bool,
}

impl Outcome {
    pub const fn confirmed(label: Label) -> Self {
        Self {
            label,
            confirmed: true,
        }
    }

    pub const fn provisional(label: Label) -> Self {
        Self {
            label,
            confirmed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordPredicate {
    /// `word_count > n`
    Above(usize),
    /// `word_count < n`
    Below(usize),
    Always,
}

impl WordPredicate {
    pub fn holds(&self, word_count: usize) -> bool {
        match *self {
            Self::Above(n) => word_count > n,
            Self::Below(n) => word_count < n,
            Self::Always => true,
        }
    }
}

impl fmt::Display for WordPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Above(n) => write!(f, "word_count > {n}"),
            Self::Below(n) => write!(f, "word_count < {n}"),
            Self::Always => f.write_str("always"),
        }
    }
}

/// Upper bound (exclusive) for resolving `Note_OR_Comment` to Comment.
pub const COMMENT_MAX_WORDS: usize = 10_000;
/// Upper bound (inclusive) for resolving `Note_OR_Comment` to Note.
pub const NOTE_MAX_WORDS: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Threshold {
        predicate: WordPredicate,
        if_true: Outcome,
        if_false: Outcome,
    },
    /// Three-way split used for `Note_OR_Comment`.
    NoteOrComment,
}

impl LengthRule {
    pub fn apply(&self, word_count: usize) -> Outcome {
        match *self {
            Self::Threshold {
                predicate,
                if_true,
                if_false,
            } => {
                if predicate.holds(word_count) {
                    if_true
                } else {
                    if_false
                }
            }
            Self::NoteOrComment => resolve_note_or_comment(word_count),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Threshold { predicate, .. } => predicate.to_string(),
            Self::NoteOrComment => format!(
                "word_count < {COMMENT_MAX_WORDS} -> Comment; <= {NOTE_MAX_WORDS} -> Note; else ERROR"
            ),
        }
    }
}

/// `<10000 → Comment`, `[10000, 20000] → Note`, `>20000 → ERROR`.
pub fn resolve_note_or_comment(word_count: usize) -> Outcome {
    if word_count < COMMENT_MAX_WORDS {
        Outcome::provisional(Label::Comment)
    } else if word_count <= NOTE_MAX_WORDS {
        Outcome::provisional(Label::Note)
    } else {
        Outcome::provisional(Label::Error)
    }
}

/// The rule for an incoming label, or `None` when the label has no entry
/// (`ERROR` passes through unchanged).
pub fn rule_for(label: Label) -> Option<LengthRule> {
    use Label::*;

    let threshold = |predicate, if_true, if_false| LengthRule::Threshold {
        predicate,
        if_true,
        if_false,
    };
    let error = Outcome::provisional(Error);

    match label {
        Article => Some(threshold(
            WordPredicate::Above(15_000),
            Outcome::confirmed(Article),
            error,
        )),
        Essay => Some(threshold(
            WordPredicate::Below(20_000),
            Outcome::confirmed(Essay),
            error,
        )),
        ArticleOrEssay => Some(threshold(
            WordPredicate::Above(15_000),
            Outcome::provisional(Article),
            Outcome::provisional(Essay),
        )),
        Note => Some(threshold(
            WordPredicate::Below(18_000),
            Outcome::confirmed(Note),
            error,
        )),
        Comment => Some(threshold(
            WordPredicate::Below(10_000),
            Outcome::confirmed(Comment),
            error,
        )),
        NoteOrComment => Some(LengthRule::NoteOrComment),
        Unlabeled => Some(threshold(
            WordPredicate::Above(18_000),
            Outcome::provisional(Article),
            error,
        )),
        Miscellaneous => Some(threshold(
            WordPredicate::Always,
            Outcome::provisional(Miscellaneous),
            Outcome::provisional(Miscellaneous),
        )),
        Error => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(label: Label, wc: usize) -> Outcome {
        rule_for(label).expect("label has a rule").apply(wc)
    }

    #[test]
    fn article_threshold() {
        assert_eq!(apply(Label::Article, 15_001), Outcome::confirmed(Label::Article));
        assert_eq!(apply(Label::Article, 15_000), Outcome::provisional(Label::Error));
    }

    #[test]
    fn essay_threshold() {
        assert_eq!(apply(Label::Essay, 19_999), Outcome::confirmed(Label::Essay));
        assert_eq!(apply(Label::Essay, 20_000), Outcome::provisional(Label::Error));
    }

    #[test]
    fn article_or_essay_splits_unconfirmed() {
        assert_eq!(
            apply(Label::ArticleOrEssay, 15_001),
            Outcome::provisional(Label::Article)
        );
        assert_eq!(
            apply(Label::ArticleOrEssay, 15_000),
            Outcome::provisional(Label::Essay)
        );
    }

    #[test]
    fn note_and_comment_thresholds() {
        assert_eq!(apply(Label::Note, 17_999), Outcome::confirmed(Label::Note));
        assert_eq!(apply(Label::Note, 18_000), Outcome::provisional(Label::Error));
        assert_eq!(apply(Label::Comment, 9_999), Outcome::confirmed(Label::Comment));
        assert_eq!(apply(Label::Comment, 10_000), Outcome::provisional(Label::Error));
    }

    #[test]
    fn note_or_comment_is_a_function_of_word_count() {
        assert_eq!(resolve_note_or_comment(0).label, Label::Comment);
        assert_eq!(resolve_note_or_comment(9_999).label, Label::Comment);
        assert_eq!(resolve_note_or_comment(10_000).label, Label::Note);
        assert_eq!(resolve_note_or_comment(20_000).label, Label::Note);
        assert_eq!(resolve_note_or_comment(20_001).label, Label::Error);
        assert!(!resolve_note_or_comment(5_000).confirmed);
    }

    #[test]
    fn unlabeled_long_documents_become_articles() {
        assert_eq!(
            apply(Label::Unlabeled, 18_001),
            Outcome::provisional(Label::Article)
        );
        assert_eq!(apply(Label::Unlabeled, 18_000).label, Label::Error);
    }

    #[test]
    fn miscellaneous_is_a_no_op() {
        assert_eq!(apply(Label::Miscellaneous, 0).label, Label::Miscellaneous);
        assert_eq!(
            apply(Label::Miscellaneous, 100_000).label,
            Label::Miscellaneous
        );
    }

    #[test]
    fn error_has_no_entry() {
        assert!(rule_for(Label::Error).is_none());
    }

    #[test]
    fn every_outcome_is_in_the_label_set() {
        for label in Label::ALL {
            if let Some(rule) = rule_for(label) {
                for wc in [0, 9_999, 10_000, 15_000, 15_001, 18_000, 20_000, 20_001] {
                    let out = rule.apply(wc);
                    assert!(Label::ALL.contains(&out.label));
                    assert!(!out.confirmed || out.label.is_confirmable());
                }
            }
        }
    }
}
