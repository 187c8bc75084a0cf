use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to parse XML document {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),

    #[error("Input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an XML error for a document that was not read from disk
    pub fn xml_inline(err: roxmltree::Error) -> Self {
        Error::Xml {
            path: PathBuf::from("<inline>"),
            message: err.to_string(),
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::InputDirNotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Whether the error came from a malformed input document
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, Error::Xml { .. })
    }
}
