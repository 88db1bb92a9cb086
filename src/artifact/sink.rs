use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{ArtifactSink, CatalogDocument, Encoding, Written};
use crate::config::ArtifactConfig;
use crate::error::SinkError;

/// Writes the catalog under `output_dir/resource_stem.<ext>`.
///
/// Bytes go to a staging file in the destination directory first and are
/// renamed into place; the staging file is removed on every failure path.
/// With `fallback_to_plain`, a failed compressed write is retried as plain JSON.
#[derive(Debug, Clone)]
pub struct FileSink {
    output_dir: PathBuf,
    resource_stem: PathBuf,
    encoding: Encoding,
    fallback_to_plain: bool,
}

impl FileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let defaults = ArtifactConfig::default();
        Self {
            output_dir: output_dir.into(),
            resource_stem: defaults.resource_stem,
            encoding: defaults.encoding,
            fallback_to_plain: defaults.fallback_to_plain,
        }
    }

    pub fn from_config(config: &ArtifactConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            resource_stem: config.resource_stem.clone(),
            encoding: config.encoding,
            fallback_to_plain: config.fallback_to_plain,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_fallback(mut self, fallback_to_plain: bool) -> Self {
        self.fallback_to_plain = fallback_to_plain;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn path_for(&self, encoding: Encoding) -> PathBuf {
        let mut name = OsString::from(self.resource_stem.as_os_str());
        name.push(".");
        name.push(encoding.extension());
        self.output_dir.join(name)
    }

    fn write_encoded(&self, document: &CatalogDocument, encoding: Encoding) -> Result<Written, SinkError> {
        let bytes = encoding.encode(document)?;
        let path = self.path_for(encoding);
        write_staged(&path, &bytes)?;
        Ok(Written { location: path, encoding, bytes: bytes.len() })
    }
}

impl ArtifactSink for FileSink {
    fn persist(&mut self, document: &CatalogDocument) -> Result<Written, SinkError> {
        match self.write_encoded(document, self.encoding) {
            Ok(written) => {
                info!(path = %written.location.display(), bytes = written.bytes, encoding = %written.encoding, "catalog written");
                Ok(written)
            }
            Err(err) if self.encoding.is_compressed() && self.fallback_to_plain => {
                warn!(error = %err, "compressed catalog write failed, falling back to plain json");
                let written = self.write_encoded(document, Encoding::Json)?;
                info!(path = %written.location.display(), bytes = written.bytes, "catalog written");
                Ok(written)
            }
            Err(err) => Err(err),
        }
    }
}

fn write_staged(path: &Path, bytes: &[u8]) -> Result<(), SinkError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|e| SinkError::io(&parent, e))?;

    //dropping the staging file deletes it, so every early return cleans up
    let mut staging = NamedTempFile::new_in(&parent).map_err(|e| SinkError::io(&parent, e))?;
    debug!(staging = %staging.path().display(), "staging catalog");
    staging.write_all(bytes).map_err(|e| SinkError::io(staging.path(), e))?;
    staging.flush().map_err(|e| SinkError::io(staging.path(), e))?;

    staging.persist(path).map_err(|e| SinkError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::read_document;
    use tempfile::TempDir;

    fn mk_document() -> CatalogDocument {
        let mut doc = CatalogDocument::new();
        doc.insert("a.Color", "a.Colors", "RED", "a.Red");
        doc
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn writes_compressed_artifact_and_reads_it_back() {
        let tmp = TempDir::new().unwrap();
        let mut sink = FileSink::new(tmp.path());

        let written = sink.persist(&mk_document()).unwrap();

        assert_eq!(written.encoding, Encoding::JsonZstd);
        assert_eq!(written.location, tmp.path().join("assets/catalog/catalog.json.zst"));
        assert_eq!(read_document(&written.location, Encoding::JsonZstd).unwrap(), mk_document());
        //nothing but the artifact is left behind
        assert_eq!(dir_entries(&tmp.path().join("assets/catalog")), vec!["catalog.json.zst".to_string()]);
    }

    #[test]
    fn overwrites_an_existing_artifact() {
        let tmp = TempDir::new().unwrap();
        let mut sink = FileSink::new(tmp.path()).with_encoding(Encoding::Json);
        sink.persist(&CatalogDocument::new()).unwrap();
        let written = sink.persist(&mk_document()).unwrap();

        assert_eq!(read_document(&written.location, Encoding::Json).unwrap(), mk_document());
    }

    #[test]
    fn failed_write_removes_the_staging_file() {
        let tmp = TempDir::new().unwrap();
        let mut sink = FileSink::new(tmp.path()).with_encoding(Encoding::Json);
        //a directory squatting on the target path makes the final rename fail
        std::fs::create_dir_all(sink.path_for(Encoding::Json)).unwrap();

        let err = sink.persist(&mk_document()).unwrap_err();

        assert!(matches!(err, SinkError::Io { .. }));
        assert_eq!(dir_entries(&tmp.path().join("assets/catalog")), vec!["catalog.json".to_string()]);
    }

    #[test]
    fn compressed_failure_falls_back_to_plain_json() {
        let tmp = TempDir::new().unwrap();
        let mut sink = FileSink::new(tmp.path());
        std::fs::create_dir_all(sink.path_for(Encoding::JsonZstd)).unwrap();

        let written = sink.persist(&mk_document()).unwrap();

        assert_eq!(written.encoding, Encoding::Json);
        assert_eq!(read_document(&written.location, Encoding::Json).unwrap(), mk_document());
        assert_eq!(
            dir_entries(&tmp.path().join("assets/catalog")),
            vec!["catalog.json".to_string(), "catalog.json.zst".to_string()]
        );
    }

    #[test]
    fn no_fallback_means_the_error_surfaces() {
        let tmp = TempDir::new().unwrap();
        let mut sink = FileSink::new(tmp.path()).with_fallback(false);
        std::fs::create_dir_all(sink.path_for(Encoding::JsonZstd)).unwrap();

        assert!(sink.persist(&mk_document()).is_err());
        assert!(!sink.path_for(Encoding::Json).exists());
    }

    #[test]
    fn config_drives_location_and_encoding() {
        let tmp = TempDir::new().unwrap();
        let config = ArtifactConfig {
            output_dir: tmp.path().to_path_buf(),
            resource_stem: PathBuf::from("registry"),
            encoding: Encoding::Toon,
            ..ArtifactConfig::default()
        };
        let mut sink = FileSink::from_config(&config);

        let written = sink.persist(&mk_document()).unwrap();

        assert_eq!(written.location, tmp.path().join("registry.toon"));
        assert_eq!(read_document(&written.location, Encoding::Toon).unwrap(), mk_document());
    }
}
