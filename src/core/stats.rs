// run-level counters and the final report block
use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::state::{FailureKind, ValidationOutcome};

const RULE: &str = "====================================";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub rounds: u32,
    pub successes: u32,
    /// Rejected candidates. Warnings never count here.
    pub failures: u32,
    /// Every reported issue, warnings included, by category.
    pub by_category: BTreeMap<FailureKind, u32>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_round(&mut self) {
        self.rounds += 1;
    }

    pub fn record_issue(&mut self, kind: FailureKind) {
        *self.by_category.entry(kind).or_insert(0) += 1;
    }

    pub fn record_outcome(&mut self, outcome: ValidationOutcome) {
        match outcome {
            ValidationOutcome::Accepted => self.successes += 1,
            ValidationOutcome::Rejected(_) => self.failures += 1,
        }
    }

    pub fn count(&self, kind: FailureKind) -> u32 {
        self.by_category.get(&kind).copied().unwrap_or(0)
    }

    pub fn warnings(&self) -> u32 {
        self.by_category.iter().filter(|(k, _)| !k.is_hard()).map(|(_, n)| n).sum()
    }

    /// The statistics block, one line per entry. Every category is listed,
    /// zero counts included, so reports from different runs line up.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            RULE.to_string(),
            "Catalog Stats".to_string(),
            RULE.to_string(),
            format!(
                "Rounds: {}, Assignments: {}, Failures: {}",
                self.rounds, self.successes, self.failures
            ),
        ];
        for kind in FailureKind::ALL {
            let suffix = if kind.is_hard() { "" } else { " [warning]" };
            lines.push(format!("  {}{}: {}", kind.label(), suffix, self.count(kind)));
        }
        lines.push(RULE.to_string());
        lines
    }
}
