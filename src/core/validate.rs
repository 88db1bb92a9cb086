// validation of a single tagged declaration
use tracing::debug;

use crate::core::conform::{conforms, conforms_erased};
use crate::core::diagnostics::{Diagnostic, DiagnosticSink};
use crate::core::env::TypeEnvironment;
use crate::core::field::validate_field;
use crate::core::mapping::{Assignment, InsertResult};
use crate::core::run::CatalogRun;
use crate::core::state::{FailureKind, Issue, ValidationOutcome, outcome_of};
use crate::core::types::{CandidateDeclaration, erase};

impl<D: DiagnosticSink> CatalogRun<D> {
    /// Runs every check on one candidate and, if nothing fatal turned up,
    /// claims its (catalog, container, field) leaf.
    ///
    /// Steps, in report order:
    /// 1) kind: only types may carry the tag; anything else stops here
    /// 2) interface: declared type must be, or directly implement, the catalog type
    ///    (and the catalog type the configured root type, if any)
    /// 3) declared match: same check on erased forms
    /// 4) container must resolve; without it there is nothing to check fields on
    /// 5) field checks
    /// 6) strict-once insert; an occupied leaf is a duplicate
    pub fn validate_one<E>(&mut self, env: &E, candidate: &CandidateDeclaration) -> ValidationOutcome
    where
        E: TypeEnvironment + ?Sized,
    {
        let id = candidate.identity.as_str();
        let tag = &candidate.tag;
        let mut issues = Vec::new();

        //1) fields read off a non-type are meaningless, stop before any lookup
        if !candidate.kind.is_type_like() {
            issues.push(Issue::new(
                FailureKind::NotAType,
                id,
                format!("the catalog tag can only be placed on types, found a {:?} declaration", candidate.kind),
            ));
            return self.conclude(candidate, issues);
        }

        //2) + 3)
        let catalog_resolved = env.resolve_type(&tag.catalog_type_class).is_some();
        if !catalog_resolved {
            issues.push(Issue::new(
                FailureKind::WrongInterface,
                id,
                format!("catalog type {} cannot be resolved", tag.catalog_type_class),
            ));
        } else {
            if !conforms(env, &candidate.declared_type, &tag.catalog_type_class) {
                issues.push(Issue::new(
                    FailureKind::WrongInterface,
                    id,
                    format!("{} does not implement {}", candidate.declared_type, tag.catalog_type_class),
                ));
            }

            if let Some(root) = self.config.engine.root_type.as_deref() {
                if !conforms(env, &tag.catalog_type_class, root) {
                    issues.push(Issue::new(
                        FailureKind::WrongInterface,
                        id,
                        format!("catalog type {} does not implement {}", tag.catalog_type_class, root),
                    ));
                }
            }

            if !conforms_erased(env, &candidate.declared_type, &tag.catalog_type_class) {
                issues.push(Issue::new(
                    FailureKind::WrongInterface,
                    id,
                    format!("{} is not an instance of {}", erase(&candidate.declared_type), erase(&tag.catalog_type_class)),
                ));
            }
        }

        //4) + 5)
        match env.resolve_type(&tag.container_class) {
            None => issues.push(Issue::new(
                FailureKind::MissingContainer,
                id,
                format!("catalog container class {} does not exist", tag.container_class),
            )),
            Some(container) => {
                let check = validate_field(
                    env,
                    id,
                    &container,
                    &tag.field,
                    &tag.catalog_type_class,
                    self.config.engine.require_static,
                );
                issues.extend(check.issues);
            }
        }

        //6) a rejected candidate never touches the tree, but an occupied leaf is still reported
        let existing = if issues.iter().any(Issue::is_hard) {
            self.tree.get(&tag.catalog_type_class, &tag.container_class, &tag.field).cloned()
        } else {
            let assignment = Assignment::new(id, format!("{} (round {})", id, self.stats.rounds));
            match self.tree.try_insert(&tag.catalog_type_class, &tag.container_class, &tag.field, assignment) {
                InsertResult::Inserted => None,
                InsertResult::AlreadyPresent(existing) => Some(existing),
            }
        };
        if let Some(existing) = existing {
            issues.push(Issue::new(
                FailureKind::Duplicate,
                id,
                format!(
                    "field {} in {} already has a mapping: {}",
                    tag.field, tag.container_class, existing.provenance
                ),
            ));
        }

        self.conclude(candidate, issues)
    }

    //record issues, report them, count the outcome
    fn conclude(&mut self, candidate: &CandidateDeclaration, issues: Vec<Issue>) -> ValidationOutcome {
        let outcome = outcome_of(&issues);

        for issue in issues {
            self.stats.record_issue(issue.kind);
            let diagnostic = if issue.is_hard() {
                Diagnostic::error(issue.message.clone())
            } else {
                Diagnostic::warning(issue.message.clone())
            };
            self.diagnostics.report(diagnostic.on(&candidate.identity));
            if issue.is_hard() {
                self.failures.push(issue);
            } else {
                self.warnings.push(issue);
            }
        }

        self.stats.record_outcome(outcome);
        debug!(candidate = %candidate.identity, ?outcome, "candidate validated");
        outcome
    }
}
