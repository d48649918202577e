//! Error types for roster-core

use thiserror::Error;

/// Result type alias for roster-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for roster-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
