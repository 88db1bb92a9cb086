// host-side reflective lookup, injected into every round
use std::collections::{BTreeMap, VecDeque};

use serde::Deserialize;

use crate::core::types::{CandidateDeclaration, MemberDecl, TypeInfo, TypeName, erase};

/// What the engine needs from the host: the tagged declarations of the current
/// round and enough reflection to resolve types, their direct supertypes and
/// their declared members.
///
/// Only `find_tagged_declarations` and `resolve_type` are required; the other
/// two read straight off the resolved [`TypeInfo`] unless the host knows better.
pub trait TypeEnvironment {
    /// Declarations bearing the catalog tag that appeared in this round.
    fn find_tagged_declarations(&mut self) -> Vec<CandidateDeclaration>;

    fn resolve_type(&self, name: &str) -> Option<TypeInfo>;

    fn direct_supertypes(&self, ty: &TypeInfo) -> Vec<TypeName> {
        ty.supertypes.clone()
    }

    fn declared_members(&self, ty: &TypeInfo) -> Vec<MemberDecl> {
        ty.members.clone()
    }
}

/// In-memory environment: a fixed type table plus a queue of rounds.
///
/// Every call to `find_tagged_declarations` pops one round; once the queue is
/// drained it keeps returning empty batches. Can be deserialized from a
/// manifest of the form `{ types = [...], rounds = [[...], ...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "EnvironmentManifest")]
pub struct StaticEnvironment {
    types: BTreeMap<TypeName, TypeInfo>,
    rounds: VecDeque<Vec<CandidateDeclaration>>,
}

#[derive(Deserialize)]
struct EnvironmentManifest {
    #[serde(default)]
    types: Vec<TypeInfo>,
    #[serde(default)]
    rounds: Vec<Vec<CandidateDeclaration>>,
}

impl From<EnvironmentManifest> for StaticEnvironment {
    fn from(manifest: EnvironmentManifest) -> Self {
        let mut env = StaticEnvironment::new();
        for ty in manifest.types {
            env.add_type(ty);
        }
        for round in manifest.rounds {
            env.push_round(round);
        }
        env
    }
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    //later registrations under the same erased name replace earlier ones
    pub fn add_type(&mut self, ty: TypeInfo) -> &mut Self {
        self.types.insert(erase(&ty.name).to_string(), ty);
        self
    }

    pub fn with_type(mut self, ty: TypeInfo) -> Self {
        self.add_type(ty);
        self
    }

    pub fn push_round(&mut self, candidates: Vec<CandidateDeclaration>) -> &mut Self {
        self.rounds.push_back(candidates);
        self
    }

    pub fn pending_rounds(&self) -> usize {
        self.rounds.len()
    }
}

impl TypeEnvironment for StaticEnvironment {
    fn find_tagged_declarations(&mut self) -> Vec<CandidateDeclaration> {
        self.rounds.pop_front().unwrap_or_default()
    }

    fn resolve_type(&self, name: &str) -> Option<TypeInfo> {
        self.types.get(erase(name)).cloned()
    }
}
