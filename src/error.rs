use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::Encoding;

/// Failures of the artifact sink. Reported, never fatal to the run.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode catalog as {encoding}: {message}")]
    Encode { encoding: Encoding, message: String },
    #[error("failed to decode {encoding} catalog: {message}")]
    Decode { encoding: Encoding, message: String },
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SinkError::Io { path: path.into(), source }
    }
}

/// Misuse of the run state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("the run has already finished; start a new run")]
    Finished,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
