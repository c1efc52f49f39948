//! Directory client error types.
//!
//! ## Security Note
//!
//! Error messages must not carry admin passwords or bearer tokens.

use thiserror::Error;

/// Errors returned by the identity directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Admin authentication failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Type of resource (e.g., "user", "group").
        resource: &'static str,
        /// Identifier used for the lookup.
        id: String,
    },

    /// Non-success response from the admin API.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl DirectoryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Creates an API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Checks if the directory reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { status: 404, .. })
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
