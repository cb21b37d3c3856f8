//! Rule-based genre classifier.
//!
//! Steps run in a fixed order with early exit:
//!
//! - **A** pre-filter: short documents are `Miscellaneous` and stop here.
//! - **B** section-header keywords near the top of the main text.
//! - **C** student-authorship hints, only while the label is `Unlabeled`.
//! - **D** length validation, applied exactly once to the A–C label.
//! - **E** escalation of `ERROR` to a [`SemanticFallback`].
//!
//! Classification is a pure function of the [`PaperRecord`]; the caller owns
//! the [`ClassificationLog`](crate::ClassificationLog).

use serde_json::Value;

use crate::PaperRecord;
use crate::authorship::student_hints;
use crate::fallback::{FallbackOutcome, PendingFallback, SemanticFallback};
use crate::keywords::{self, KeywordDecision};
use crate::label::Label;
use crate::length;
use crate::trace::{ClassificationResult, Step, StepDecision, StepTrace};

/// Tunable inputs of steps A–C. Step D's table is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Documents with at most this many pages are `Miscellaneous` (default 3).
    pub max_misc_pages: usize,
    /// Words of main text searched for section headers (default 1000).
    pub keyword_prefix_words: usize,
    /// Character cap on the header search prefix (default 3000).
    pub keyword_prefix_chars: usize,
    /// Upper word bound for the student-authorship rule (default 20000).
    pub student_max_words: usize,
    /// Allowed distance between a `Class of YYYY` and the publication year (default 3).
    pub class_year_window: i32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_misc_pages: 3,
            keyword_prefix_words: 1000,
            keyword_prefix_chars: 3000,
            student_max_words: 20_000,
            class_year_window: 3,
        }
    }
}

pub struct ArticleClassifier {
    config: ClassifierConfig,
    fallback: Box<dyn SemanticFallback>,
}

impl Default for ArticleClassifier {
    fn default() -> Self {
        Self {
            config: ClassifierConfig::default(),
            fallback: Box::new(PendingFallback),
        }
    }
}

impl std::fmt::Debug for ArticleClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleClassifier")
            .field("config", &self.config)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

/// Label state threaded through the steps.
struct State {
    label: Label,
    confirmed: bool,
    steps: Vec<StepTrace>,
    errors: Vec<String>,
    requires_manual_review: bool,
}

impl State {
    fn finish(self) -> ClassificationResult {
        ClassificationResult {
            label: self.label,
            confirmed: self.confirmed,
            steps: self.steps,
            requires_manual_review: self.requires_manual_review,
            errors: self.errors,
        }
    }
}

impl ArticleClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fallback(mut self, fallback: Box<dyn SemanticFallback>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Run steps A–E over one paper.
    pub fn classify(&self, paper: &PaperRecord) -> ClassificationResult {
        let mut state = State {
            label: Label::Unlabeled,
            confirmed: false,
            steps: Vec::with_capacity(5),
            errors: Vec::new(),
            requires_manual_review: false,
        };

        if self.pre_filter(paper, &mut state) {
            return self.done(paper, state);
        }
        self.section_headers(paper, &mut state);
        if state.label == Label::Unlabeled {
            self.student_authorship(paper, &mut state);
        }
        self.length_validation(paper, &mut state);
        if state.label == Label::Error {
            self.escalate(paper, &mut state);
        }

        self.done(paper, state)
    }

    fn done(&self, paper: &PaperRecord, state: State) -> ClassificationResult {
        let result = state.finish();
        tracing::debug!(
            title = %paper.title,
            label = %result.display_label(),
            steps = result.steps.len(),
            review = result.requires_manual_review,
            "classified"
        );
        result
    }

    /// Step A. Returns `true` when evaluation stops.
    fn pre_filter(&self, paper: &PaperRecord, state: &mut State) -> bool {
        let max = self.config.max_misc_pages;
        let trace = StepTrace::new(
            Step::PreFilter,
            format!("page_count <= {max}"),
            state.label,
        )
        .with("page_count", paper.page_count);

        if paper.page_count <= max {
            state.label = Label::Miscellaneous;
            state
                .steps
                .push(trace.outcome(Label::Miscellaneous, false, StepDecision::Stop));
            true
        } else {
            state
                .steps
                .push(trace.outcome(state.label, false, StepDecision::Continue));
            false
        }
    }

    /// Step B.
    fn section_headers(&self, paper: &PaperRecord, state: &mut State) {
        let prefix = keywords::search_prefix(
            &paper.main_text,
            self.config.keyword_prefix_words,
            self.config.keyword_prefix_chars,
        );
        let found = keywords::find_categories(prefix);
        let names: Vec<Value> = found.iter().map(|c| Value::from(c.as_str())).collect();

        let trace = StepTrace::new(
            Step::SectionHeaders,
            "section-header tokens in main-text prefix",
            state.label,
        )
        .with("prefix_chars", prefix.chars().count())
        .with("categories", names);

        let trace = match keywords::decide(&found) {
            KeywordDecision::Continue => trace.outcome(state.label, false, StepDecision::Continue),
            KeywordDecision::Label(label) => {
                if label == Label::Error {
                    let list: Vec<&str> = found.iter().map(|c| c.as_str()).collect();
                    state.errors.push(format!(
                        "conflicting section headers: {}",
                        list.join(", ")
                    ));
                }
                state.label = label;
                trace.outcome(label, false, StepDecision::Assigned)
            }
        };
        state.steps.push(trace);
    }

    /// Step C.
    fn student_authorship(&self, paper: &PaperRecord, state: &mut State) {
        let hints = student_hints(
            &paper.authors,
            paper.publication_year,
            self.config.class_year_window,
        );
        let short_enough = paper.word_count <= self.config.student_max_words;

        let trace = StepTrace::new(
            Step::StudentAuthorship,
            format!(
                "student author marker and word_count <= {}",
                self.config.student_max_words
            ),
            state.label,
        )
        .with("jd_candidate", hints.jd_candidate)
        .with("class_years", hints.class_years.clone())
        .with(
            "matching_class_year",
            hints.matching_class_year.map_or(Value::Null, Value::from),
        )
        .with("publication_year", paper.publication_year)
        .with("word_count", paper.word_count);

        let trace = if hints.is_student() && short_enough {
            state.label = Label::NoteOrComment;
            trace.outcome(Label::NoteOrComment, false, StepDecision::Assigned)
        } else {
            trace.outcome(state.label, false, StepDecision::Unchanged)
        };
        state.steps.push(trace);
    }

    /// Step D.
    fn length_validation(&self, paper: &PaperRecord, state: &mut State) {
        let incoming = state.label;
        let wc = paper.word_count;

        let trace = match length::rule_for(incoming) {
            None => StepTrace::new(
                Step::LengthValidation,
                format!("no length rule for {incoming}"),
                incoming,
            )
            .with("word_count", wc)
            .outcome(incoming, state.confirmed, StepDecision::Unchanged),
            Some(rule) => {
                let out = rule.apply(wc);
                let decision = if out.label == incoming && !out.confirmed {
                    StepDecision::Unchanged
                } else {
                    StepDecision::Assigned
                };
                state.label = out.label;
                state.confirmed = out.confirmed;
                if out.label == Label::Error {
                    state
                        .errors
                        .push(format!("{incoming} failed length check at {wc} words"));
                }
                StepTrace::new(Step::LengthValidation, rule.describe(), incoming)
                    .with("word_count", wc)
                    .outcome(out.label, out.confirmed, decision)
            }
        };
        state.steps.push(trace);
    }

    /// Step E.
    fn escalate(&self, paper: &PaperRecord, state: &mut State) {
        state.requires_manual_review = true;
        let trace = StepTrace::new(
            Step::Escalation,
            "unresolved document sent to semantic fallback",
            state.label,
        )
        .with("fallback", self.fallback.name());

        let trace = match self.fallback.resolve(paper) {
            FallbackOutcome::Pending => {
                state.errors.push(format!(
                    "semantic fallback '{}' pending",
                    self.fallback.name()
                ));
                trace
                    .with("outcome", "pending")
                    .outcome(Label::Error, false, StepDecision::Unchanged)
            }
            FallbackOutcome::Resolved(label) => {
                state.label = label;
                state.confirmed = false;
                trace
                    .with("outcome", label.as_str())
                    .outcome(label, false, StepDecision::Assigned)
            }
        };
        state.steps.push(trace);
    }
}
