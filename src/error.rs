//! Error types for rust-dbgraph

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading metadata or writing the graph.
///
/// The join inference itself never fails; everything here belongs to the
/// loading, archiving and rendering layers around it.
#[derive(Error, Debug)]
pub enum DbGraphError {
    #[error("Failed to read {path}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {name} from {path}")]
    JsonDecodeError {
        path: PathBuf,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {name}")]
    JsonEncodeError {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("File has invalid encoding: {path}")]
    InvalidEncoding { path: PathBuf },

    #[error("Invalid file pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Source directory not found: {path}")]
    SourceDirNotFound { path: PathBuf },

    #[error("ZIP archive error: {message}")]
    ZipError { message: String },
}

impl From<zip::result::ZipError> for DbGraphError {
    fn from(err: zip::result::ZipError) -> Self {
        DbGraphError::ZipError {
            message: err.to_string(),
        }
    }
}
