//! Error handling for the tracker shell.
//!
//! The engine crates never fail on record data; everything here comes from
//! the edges: reading files, parsing configuration and building URLs.

use std::path::PathBuf;

use request_engine::{FilterSpecError, NumberingError};
use thiserror::Error;

/// Main error type for the application shell
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Filter error: {0}")]
    Filter(#[from] FilterSpecError),

    #[error("Numbering error: {0}")]
    Numbering(#[from] NumberingError),
}

impl TrackerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO",
            Self::Json(_) => "JSON",
            Self::Yaml(_) => "YAML",
            Self::Url(_) => "URL",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::UnknownValue { .. } => "UNKNOWN_VALUE",
            Self::Filter(e) => e.code(),
            Self::Numbering(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
