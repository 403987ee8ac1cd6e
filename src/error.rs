use std::io;

use thiserror::Error;

/// Errors from the document collection and its storage
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("document collection is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no document with id '{0}'")]
    NotFound(String),
}

/// A formatting command name that is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown formatting command '{0}'")]
pub struct CommandParseError(pub String);

pub type Result<T, E = LibraryError> = std::result::Result<T, E>;
