//! Decision trace recorded by the classifier.
//!
//! Every evaluated step appends one [`StepTrace`], whether or not it changed
//! the label, so a result always explains how its label was reached.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::label::Label;

/// The classifier stages, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PreFilter,
    SectionHeaders,
    StudentAuthorship,
    LengthValidation,
    Escalation,
}

impl Step {
    pub fn letter(&self) -> char {
        match self {
            Self::PreFilter => 'A',
            Self::SectionHeaders => 'B',
            Self::StudentAuthorship => 'C',
            Self::LengthValidation => 'D',
            Self::Escalation => 'E',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PreFilter => "pre_filter",
            Self::SectionHeaders => "section_headers",
            Self::StudentAuthorship => "student_authorship",
            Self::LengthValidation => "length_validation",
            Self::Escalation => "escalation",
        }
    }
}

/// What a step did to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDecision {
    /// No decision; evaluation moves on with the label unchanged.
    Continue,
    /// The step set a label; later steps still run.
    Assigned,
    /// The step set a label and ended evaluation.
    Stop,
    /// Evidence was recorded but the label was left as is.
    Unchanged,
}

/// Named inputs a step considered.
pub type Evidence = BTreeMap<String, Value>;

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTrace {
    pub step: Step,
    /// Human-readable statement of the rule evaluated.
    pub rule: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub evidence: Evidence,
    pub label_before: Label,
    pub label_after: Label,
    #[serde(default)]
    pub confirmed: bool,
    pub decision: StepDecision,
}

impl StepTrace {
    pub fn new(step: Step, rule: impl Into<String>, label_before: Label) -> Self {
        Self {
            step,
            rule: rule.into(),
            evidence: Evidence::new(),
            label_before,
            label_after: label_before,
            confirmed: false,
            decision: StepDecision::Continue,
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.evidence.insert(key.to_string(), value.into());
        self
    }

    pub fn outcome(mut self, label_after: Label, confirmed: bool, decision: StepDecision) -> Self {
        self.label_after = label_after;
        self.confirmed = confirmed;
        self.decision = decision;
        self
    }
}

/// Final output of one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Set when the label passed its length check in step D.
    #[serde(default)]
    pub confirmed: bool,
    pub steps: Vec<StepTrace>,
    pub requires_manual_review: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ClassificationResult {
    /// Label with the confirmed marker applied, e.g. `Note (confirmed)`.
    pub fn display_label(&self) -> String {
        self.label.display_with(self.confirmed)
    }

    pub fn step(&self, step: Step) -> Option<&StepTrace> {
        self.steps.iter().find(|s| s.step == step)
    }

    /// Render the trace as indented text, one step per line.
    ///
    /// ```text
    /// Note (confirmed)
    /// +-- A pre_filter: page_count <= 3 -> Unlabeled [continue]
    /// `-- D length_validation: word_count < 18000 -> Note (confirmed) [assigned]
    /// ```
    pub fn render_trace(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.display_label());
        let last = self.steps.len().saturating_sub(1);
        for (i, s) in self.steps.iter().enumerate() {
            let branch = if i == last { "`--" } else { "+--" };
            let decision = match s.decision {
                StepDecision::Continue => "continue",
                StepDecision::Assigned => "assigned",
                StepDecision::Stop => "stop",
                StepDecision::Unchanged => "unchanged",
            };
            let _ = writeln!(
                out,
                "{} {} {}: {} -> {} [{}]",
                branch,
                s.step.letter(),
                s.step.name(),
                s.rule,
                s.label_after.display_with(s.confirmed),
                decision
            );
        }
        out
    }
}
