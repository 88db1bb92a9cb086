// per-candidate outcome taxonomy
use std::fmt;

use serde::Serialize;

use crate::core::diagnostics::Severity;

/// Every problem the engine can report about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    NotAType,
    WrongInterface,
    MissingContainer,
    MissingField,
    FieldNotVisible,
    FieldNotStatic,
    FieldNotFinal,
    FieldWrongType,
    Duplicate,
}

impl FailureKind {
    /// Report order.
    pub const ALL: [FailureKind; 9] = [
        FailureKind::NotAType,
        FailureKind::WrongInterface,
        FailureKind::MissingContainer,
        FailureKind::MissingField,
        FailureKind::FieldNotVisible,
        FailureKind::FieldNotStatic,
        FailureKind::FieldNotFinal,
        FailureKind::FieldWrongType,
        FailureKind::Duplicate,
    ];

    //hard failures reject the candidate; the rest are warnings
    pub fn is_hard(self) -> bool {
        !matches!(self, FailureKind::FieldNotFinal)
    }

    /// Whether a failure of this kind leaves the mapping tree untrustworthy.
    ///
    /// A duplicate never reaches the tree (first wins), so it rejects the
    /// candidate without voiding the artifact.
    pub fn voids_artifact(self) -> bool {
        self.is_hard() && self != FailureKind::Duplicate
    }

    pub fn severity(self) -> Severity {
        if self.is_hard() { Severity::Error } else { Severity::Warning }
    }

    pub fn label(self) -> &'static str {
        match self {
            FailureKind::NotAType => "not-a-type",
            FailureKind::WrongInterface => "wrong-interface",
            FailureKind::MissingContainer => "missing-container",
            FailureKind::MissingField => "missing-field",
            FailureKind::FieldNotVisible => "field-not-public",
            FailureKind::FieldNotStatic => "field-not-static",
            FailureKind::FieldNotFinal => "field-not-final",
            FailureKind::FieldWrongType => "field-wrong-type",
            FailureKind::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    /// Carries the first hard failure in check order.
    Rejected(FailureKind),
}

impl ValidationOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}

/// One reported problem, tied to the candidate it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: FailureKind,
    pub candidate: String,
    pub message: String,
}

impl Issue {
    pub fn new(kind: FailureKind, candidate: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, candidate: candidate.into(), message: message.into() }
    }

    pub fn is_hard(&self) -> bool {
        self.kind.is_hard()
    }
}

/// Folds a candidate's issues into its outcome.
pub fn outcome_of(issues: &[Issue]) -> ValidationOutcome {
    match issues.iter().find(|i| i.is_hard()) {
        Some(i) => ValidationOutcome::Rejected(i.kind),
        None => ValidationOutcome::Accepted,
    }
}
