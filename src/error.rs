//! Error types for dataset loading, label storage, and export
//!
//! Each failure class maps to one user-facing outcome: load errors abort the
//! load and keep the previous session, export errors abort the download, and
//! storage read errors silently degrade to an empty label store.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a file collection into a session
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data.json found in the selected folder")]
    MissingManifest,

    #[error("found {count} data.json files; expected exactly one")]
    AmbiguousManifest { count: usize },

    #[error("data.json is malformed: {0}")]
    MalformedManifest(String),

    #[error("entries {first} and {second} share pair key '{key}'")]
    DuplicatePairKey {
        key: String,
        first: usize,
        second: usize,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while reading or writing the durable label blob
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("stored labels at {path} are unreadable: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("failed to persist labels to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while building or writing the export archive
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no pairs are labeled yet")]
    Empty,

    #[error("failed to build archive: {0}")]
    ArchiveBuild(String),

    #[error("failed to write archive to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::ArchiveBuild(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::ArchiveBuild(err.to_string())
    }
}
