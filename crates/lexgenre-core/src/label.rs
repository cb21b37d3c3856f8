use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of genre labels.
///
/// Whether a label passed length validation is tracked separately as
/// [`ClassificationResult::confirmed`](crate::ClassificationResult::confirmed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    Unlabeled,
    Article,
    Essay,
    #[serde(rename = "Article_OR_Essay")]
    ArticleOrEssay,
    Note,
    Comment,
    #[serde(rename = "Note_OR_Comment")]
    NoteOrComment,
    Miscellaneous,
    #[serde(rename = "ERROR")]
    Error,
}

impl Label {
    pub const ALL: [Label; 9] = [
        Label::Unlabeled,
        Label::Article,
        Label::Essay,
        Label::ArticleOrEssay,
        Label::Note,
        Label::Comment,
        Label::NoteOrComment,
        Label::Miscellaneous,
        Label::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unlabeled => "Unlabeled",
            Self::Article => "Article",
            Self::Essay => "Essay",
            Self::ArticleOrEssay => "Article_OR_Essay",
            Self::Note => "Note",
            Self::Comment => "Comment",
            Self::NoteOrComment => "Note_OR_Comment",
            Self::Miscellaneous => "Miscellaneous",
            Self::Error => "ERROR",
        }
    }

    /// Labels that can carry the confirmed marker after length validation.
    pub fn is_confirmable(&self) -> bool {
        matches!(
            self,
            Self::Article | Self::Essay | Self::Note | Self::Comment
        )
    }

    /// Render with the confirmed marker, e.g. `Article (confirmed)`.
    pub fn display_with(&self, confirmed: bool) -> String {
        if confirmed && self.is_confirmable() {
            format!("{} (confirmed)", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_marker_only_on_confirmable_labels() {
        assert_eq!(Label::Article.display_with(true), "Article (confirmed)");
        assert_eq!(Label::Article.display_with(false), "Article");
        assert_eq!(Label::Error.display_with(true), "ERROR");
        assert_eq!(Label::NoteOrComment.display_with(true), "Note_OR_Comment");
    }

    #[test]
    fn serde_names_match_display() {
        for label in Label::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            assert_eq!(serde_json::from_str::<Label>(&json).unwrap(), label);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(serde_json::from_str::<Label>("\"Book Review\"").is_err());
    }
}
