//! Shared primitives for all Rust crates in Hydrant.

#![forbid(unsafe_code)]

/// Cancellation and deadline context carried through outbound calls.
pub mod context;
/// Provider diagnostics reported back to the host.
pub mod diagnostics;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use context::{CancelHandle, RequestContext};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};

/// Result type used across Hydrant crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller credentials were missing or rejected by the remote API.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but not allowed to access a resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The remote API could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The caller cancelled the request or its deadline elapsed.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
