//! Error types for dataset operations

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Index out of bounds: index {index}, dataset has {len} examples")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot open {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Feature index {index} exceeds the maximum dimensionality {max}")]
    DimensionTooLarge { index: usize, max: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DataError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
