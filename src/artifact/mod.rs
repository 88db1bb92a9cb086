//! The persisted catalog: document model, encodings and sinks.
//!
//! ```text
//! { "version": 1, "mappings": { <catalog>: { <container>: { <field>: <identity> } } } }
//! ```

mod encoding;
mod sink;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use encoding::{DEFAULT_COMPRESSION_LEVEL, Encoding};
pub use sink::FileSink;

use crate::error::SinkError;

/// Artifact schema version.
pub const SCHEMA_VERSION: u32 = 1;

pub type FieldMappings = BTreeMap<String, String>;
pub type ContainerMappings = BTreeMap<String, FieldMappings>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub version: u32,
    pub mappings: BTreeMap<String, ContainerMappings>,
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogDocument {
    pub fn new() -> Self {
        Self { version: SCHEMA_VERSION, mappings: BTreeMap::new() }
    }

    pub fn insert(&mut self, catalog: &str, container: &str, field: &str, value: &str) {
        self.mappings
            .entry(catalog.to_string())
            .or_default()
            .entry(container.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    pub fn get(&self, catalog: &str, container: &str, field: &str) -> Option<&str> {
        self.mappings.get(catalog)?.get(container)?.get(field).map(String::as_str)
    }

    pub fn leaf_count(&self) -> usize {
        self.mappings.values().flat_map(|c| c.values()).map(|f| f.len()).sum()
    }
}

/// Where a written artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub location: PathBuf,
    pub encoding: Encoding,
    pub bytes: usize,
}

/// Storage backend for the finished catalog.
pub trait ArtifactSink {
    fn persist(&mut self, document: &CatalogDocument) -> Result<Written, SinkError>;
}

//in-memory sink, mostly for hosts that post-process the document themselves
impl ArtifactSink for Vec<CatalogDocument> {
    fn persist(&mut self, document: &CatalogDocument) -> Result<Written, SinkError> {
        self.push(document.clone());
        Ok(Written {
            location: PathBuf::from(format!("memory:{}", self.len() - 1)),
            encoding: Encoding::Json,
            bytes: 0,
        })
    }
}

/// Reads an artifact back into its logical tree.
pub fn read_document(path: impl AsRef<Path>, encoding: Encoding) -> Result<CatalogDocument, SinkError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| SinkError::io(path, e))?;
    encoding.decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_insert_get_and_count() {
        let mut doc = CatalogDocument::new();
        doc.insert("a.Color", "a.Colors", "RED", "a.Red");
        doc.insert("a.Color", "a.Colors", "BLUE", "a.Blue");
        doc.insert("a.Shape", "a.Shapes", "SQUARE", "a.Square");

        assert_eq!(doc.version, SCHEMA_VERSION);
        assert_eq!(doc.get("a.Color", "a.Colors", "BLUE"), Some("a.Blue"));
        assert_eq!(doc.get("a.Color", "a.Shapes", "BLUE"), None);
        assert_eq!(doc.leaf_count(), 3);
    }

    #[test]
    fn json_shape_matches_the_published_schema() {
        let mut doc = CatalogDocument::new();
        doc.insert("a.Color", "a.Colors", "RED", "a.Red");

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "version": 1,
                "mappings": { "a.Color": { "a.Colors": { "RED": "a.Red" } } }
            })
        );
    }

    #[test]
    fn memory_sink_keeps_documents() {
        let mut sink: Vec<CatalogDocument> = Vec::new();
        let written = sink.persist(&CatalogDocument::new()).unwrap();
        assert_eq!(written.location, PathBuf::from("memory:0"));
        assert_eq!(sink.len(), 1);
    }
}
