//! Common error types for CEDE

use thiserror::Error;

/// Common result type for CEDE operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across CEDE crates
///
/// Every core operation returns either a complete, structurally valid result
/// or one of these. Validation errors (`InvalidParameter`) are raised before
/// any state mutation or I/O; `NotFound` and `AlreadyExists` fail fast with
/// no partial manifest write.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected input (e.g. trim end at or before trim start, speed <= 0)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Requested resource not found (unknown job id or variation id)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate creation (e.g. a second `start` for the same job id)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A media collaborator (probe, detector, transcriber) produced
    /// unusable output or failed outright
    #[error("External tool failure: {0}")]
    ExternalTool(String),

    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by caller input rather than system state
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter(_) | Error::NotFound(_) | Error::AlreadyExists(_)
        )
    }
}
