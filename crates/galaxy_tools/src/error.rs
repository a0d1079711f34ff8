//! Tool errors.

use std::path::PathBuf;

use galaxy_core::error::GameError;
use thiserror::Error;

/// Errors raised by the development tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A data file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The core rejected the data or the request.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

/// Result alias for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
