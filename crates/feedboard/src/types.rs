//! Shared error type for the board runtime

use crate::board::LoadError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Board load error: {0}")]
    Load(#[from] LoadError),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("No board loaded")]
    NoBoard,
}
