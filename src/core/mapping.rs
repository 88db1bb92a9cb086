// catalog type -> container -> field -> assigned declaration
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::artifact::{CatalogDocument, SCHEMA_VERSION};

//1. keys are the exact strings from the tag, no normalization.
//2. each (catalog, container, field) leaf is assigned at most once per run.
//3. first to arrive, first to get assigned: an occupied leaf is never overwritten.
//4. sibling leaves are independent of each other.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Identity of the declaration assigned to the field.
    pub value: String,
    /// Where the assignment came from, for diagnostics only.
    pub provenance: String,
}

impl Assignment {
    pub fn new(value: impl Into<String>, provenance: impl Into<String>) -> Self {
        Self { value: value.into(), provenance: provenance.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    Inserted,
    AlreadyPresent(Assignment),
}

type FieldMap = BTreeMap<String, Assignment>;
type ContainerMap = BTreeMap<String, FieldMap>;

#[derive(Debug, Clone)]
pub struct MappingTree {
    version: u32,
    roots: BTreeMap<String, ContainerMap>,
    leaves: usize,
}

impl Default for MappingTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingTree {
    pub fn new() -> Self {
        Self { version: SCHEMA_VERSION, roots: BTreeMap::new(), leaves: 0 }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Strict-once insert. An occupied leaf is left untouched and its current
    /// assignment handed back for the duplicate report.
    pub fn try_insert(
        &mut self,
        catalog: &str,
        container: &str,
        field: &str,
        assignment: Assignment,
    ) -> InsertResult {
        let fields = self
            .roots
            .entry(catalog.to_string())
            .or_default()
            .entry(container.to_string())
            .or_default();

        match fields.entry(field.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(assignment);
                self.leaves += 1;
                InsertResult::Inserted
            }
            Entry::Occupied(existing) => InsertResult::AlreadyPresent(existing.get().clone()),
        }
    }

    pub fn get(&self, catalog: &str, container: &str, field: &str) -> Option<&Assignment> {
        self.roots.get(catalog)?.get(container)?.get(field)
    }

    pub fn contains(&self, catalog: &str, container: &str, field: &str) -> bool {
        self.get(catalog, container, field).is_some()
    }

    pub fn len(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    //for reports, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, &Assignment)> + '_ {
        self.roots.iter().flat_map(|(catalog, containers)| {
            containers.iter().flat_map(move |(container, fields)| {
                fields
                    .iter()
                    .map(move |(field, a)| (catalog.as_str(), container.as_str(), field.as_str(), a))
            })
        })
    }

    /// Full read of the tree in its persisted shape. Provenance notes stay behind.
    pub fn snapshot(&self) -> CatalogDocument {
        let mut doc = CatalogDocument::new();
        doc.version = self.version;
        for (catalog, container, field, a) in self.iter() {
            doc.insert(catalog, container, field, &a.value);
        }
        doc
    }
}
