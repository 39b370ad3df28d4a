// crates/wages-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;
use wages_parser::ParserError;

/// Coarse classification of a load failure, used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    NotFound,
    Malformed,
    Other,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file not found, expected at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("source {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build wage table for {}: {source}", .path.display())]
    Frame {
        path: PathBuf,
        #[source]
        source: ParserError,
    },
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::NotFound { .. } => LoadErrorKind::NotFound,
            LoadError::Malformed { .. } => LoadErrorKind::Malformed,
            LoadError::Io { .. } | LoadError::Frame { .. } => LoadErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
