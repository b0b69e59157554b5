//! Error types for template handling and session snapshots.

use std::path::PathBuf;

/// Errors raised while reading, filling or persisting documents.
#[derive(Debug, thiserror::Error)]
pub enum DocfillError {
    #[error("Cannot open document {path:?}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("Malformed document XML")]
    Xml(#[from] roxmltree::Error),

    #[error("Package error")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Value for '{tag}' contains {character:?}, which XML documents cannot hold")]
    InvalidValue { tag: String, character: char },

    #[error("Session snapshot error: {0}")]
    Snapshot(String),
}

impl DocfillError {
    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DocfillError::DocumentOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocfillError>;
