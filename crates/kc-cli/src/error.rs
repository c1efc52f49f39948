//! CLI error types.

use kc_directory::DirectoryError;
use kc_provision::MembershipError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory error.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Group membership error.
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// Provisioning did not complete.
    #[error("provisioning failed for {0}; verify the user's state in the directory")]
    Provisioning(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
