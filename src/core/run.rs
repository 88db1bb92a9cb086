// run coordinator: rounds, finish, report
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug_span, error, info};

use crate::artifact::{ArtifactSink, Written};
use crate::config::{ArtifactPolicy, CatalogConfig};
use crate::core::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink};
use crate::core::env::TypeEnvironment;
use crate::core::mapping::MappingTree;
use crate::core::state::Issue;
use crate::core::stats::RunStatistics;
use crate::error::RunError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Scanning,
    Finished,
}

/// What one round did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    pub candidates: usize,
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written(Written),
    /// Suppressed because the run recorded failures.
    Skipped { failures: usize },
    /// The sink failed; the message is also on the diagnostics channel.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub stats: RunStatistics,
    pub artifact: ArtifactStatus,
    /// Leaves in the mapping tree at finish time.
    pub leaves: usize,
}

/// All state of one scan, from the first round to the finish signal.
///
/// Create one per run; nothing is shared between runs, so independent runs
/// (and tests) never see each other's tree or counters.
#[derive(Debug)]
pub struct CatalogRun<D = DiagnosticLog> {
    pub(crate) config: CatalogConfig,
    pub(crate) tree: MappingTree,
    pub(crate) stats: RunStatistics,
    pub(crate) failures: Vec<Issue>,
    pub(crate) warnings: Vec<Issue>,
    pub(crate) phase: RunPhase,
    pub(crate) diagnostics: D,
}

impl CatalogRun<DiagnosticLog> {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_diagnostics(config, DiagnosticLog::new())
    }
}

impl<D: DiagnosticSink> CatalogRun<D> {
    pub fn with_diagnostics(config: CatalogConfig, diagnostics: D) -> Self {
        Self {
            config,
            tree: MappingTree::new(),
            stats: RunStatistics::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
            phase: RunPhase::Scanning,
            diagnostics,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn tree(&self) -> &MappingTree {
        &self.tree
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    /// Hard failures recorded so far, in the order they were found.
    pub fn failures(&self) -> &[Issue] {
        &self.failures
    }

    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> D {
        self.diagnostics
    }

    //does anything recorded so far make the tree unfit for emission
    pub fn has_voiding_failure(&self) -> bool {
        self.failures.iter().any(|i| i.kind.voids_artifact())
    }

    /// One round: fetch the round's tagged declarations and validate each.
    pub fn process_round<E>(&mut self, env: &mut E) -> Result<RoundSummary, RunError>
    where
        E: TypeEnvironment + ?Sized,
    {
        if self.phase == RunPhase::Finished {
            return Err(RunError::Finished);
        }

        self.stats.record_round();
        let round = self.stats.rounds;
        let _span = debug_span!("catalog_round", round).entered();

        let candidates = env.find_tagged_declarations();
        let mut summary = RoundSummary { round, candidates: candidates.len(), accepted: 0, rejected: 0 };

        for candidate in &candidates {
            if self.validate_one(&*env, candidate).is_accepted() {
                summary.accepted += 1;
            } else {
                summary.rejected += 1;
            }
        }

        info!(round, candidates = summary.candidates, accepted = summary.accepted, rejected = summary.rejected, "catalog round processed");
        Ok(summary)
    }

    /// Finish signal from the host. Writes the artifact unless the run's
    /// failures void it, then emits the statistics block, always.
    pub fn finish<S>(&mut self, sink: &mut S) -> Result<RunReport, RunError>
    where
        S: ArtifactSink + ?Sized,
    {
        if self.phase == RunPhase::Finished {
            return Err(RunError::Finished);
        }
        self.phase = RunPhase::Finished;

        let voided = self.config.artifact.policy == ArtifactPolicy::AbortOnError && self.has_voiding_failure();
        let artifact = if voided {
            let failures = self.failures.iter().filter(|i| i.kind.voids_artifact()).count();
            self.diagnostics.report(Diagnostic::error(format!(
                "catalog artifact not written: {failures} validation failure(s) recorded"
            )));
            ArtifactStatus::Skipped { failures }
        } else {
            match sink.persist(&self.tree.snapshot()) {
                Ok(written) => ArtifactStatus::Written(written),
                Err(err) => {
                    error!(error = %err, "catalog artifact could not be persisted");
                    self.diagnostics.report(Diagnostic::error(format!("failed to write catalog artifact: {err}")));
                    ArtifactStatus::Failed(err.to_string())
                }
            }
        };

        for line in self.stats.render() {
            self.diagnostics.report(Diagnostic::info(line));
        }

        Ok(RunReport { stats: self.stats.clone(), artifact, leaves: self.tree.len() })
    }
}

/// A run behind a lock, for hosts that call in from more than one thread.
///
/// Each round and the finish step hold the lock for their whole duration.
#[derive(Debug)]
pub struct SharedRun<D = DiagnosticLog> {
    inner: Mutex<CatalogRun<D>>,
}

impl<D: DiagnosticSink> SharedRun<D> {
    pub fn new(run: CatalogRun<D>) -> Self {
        Self { inner: Mutex::new(run) }
    }

    pub fn process_round<E>(&self, env: &mut E) -> Result<RoundSummary, RunError>
    where
        E: TypeEnvironment + ?Sized,
    {
        self.inner.lock().process_round(env)
    }

    pub fn finish<S>(&self, sink: &mut S) -> Result<RunReport, RunError>
    where
        S: ArtifactSink + ?Sized,
    {
        self.inner.lock().finish(sink)
    }

    pub fn with<R>(&self, f: impl FnOnce(&CatalogRun<D>) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn into_inner(self) -> CatalogRun<D> {
        self.inner.into_inner()
    }
}
