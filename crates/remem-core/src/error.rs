//! Error types for reMem platform services

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by secure store implementations
///
/// The access gate never surfaces these to the user. The driver logs them
/// and maps them onto "no credential" or "not acknowledged".
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store contents could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing service refused or could not be reached
    #[error("Secure store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
