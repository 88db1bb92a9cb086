//! Build-time validation of catalog declarations and the registry they produce.
//!
//! A host environment hands over, round by round, the declarations carrying the
//! catalog tag. Each one is checked against its catalog type, container and
//! target field, then recorded in a strict-once mapping tree. When the host
//! signals the end of the scan the tree is written out as an artifact and a
//! statistics report is emitted.

pub mod artifact;
pub mod config;
pub mod core;
pub mod error;

pub use artifact::{ArtifactSink, CatalogDocument, Encoding, FileSink, Written, read_document};
pub use config::{ArtifactConfig, ArtifactPolicy, CatalogConfig, EngineConfig};
pub use crate::core::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, Severity};
pub use crate::core::env::{StaticEnvironment, TypeEnvironment};
pub use crate::core::mapping::{Assignment, InsertResult, MappingTree};
pub use crate::core::run::{ArtifactStatus, CatalogRun, RoundSummary, RunPhase, RunReport, SharedRun};
pub use crate::core::state::{FailureKind, Issue, ValidationOutcome};
pub use crate::core::stats::RunStatistics;
pub use crate::core::types::{CandidateDeclaration, CatalogTag, DeclKind, MemberDecl, MemberKind, TypeInfo, Visibility};
pub use error::{ConfigError, RunError, SinkError};
