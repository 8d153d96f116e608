//! Error context extension trait
//!
//! Provides `.context()` / `.with_context()` for `Result<T, E>` where `E`
//! converts into [`PrefillError`]. Unlike `anyhow::Context`, the error kind
//! survives: a decode error with context is still a decode error.
//!
//! # Examples
//!
//! ```rust
//! use prefill::domain::{PrefillError, Result};
//! use prefill::domain::context::ResultExt;
//!
//! fn read_file(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .context(format!("Failed to read file: {}", path))
//! }
//! ```

use crate::domain::errors::{ConnectorError, PrefillError};
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrefillError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

/// Prefix the message of `error` with `context`, keeping its variant
fn wrap(error: PrefillError, context: impl std::fmt::Display) -> PrefillError {
    match error {
        PrefillError::Configuration(m) => PrefillError::Configuration(format!("{context}: {m}")),
        PrefillError::InsuranceDataUnreadable(m) => {
            PrefillError::InsuranceDataUnreadable(format!("{context}: {m}"))
        }
        PrefillError::Certificate(m) => PrefillError::Certificate(format!("{context}: {m}")),
        PrefillError::Validation(m) => PrefillError::Validation(format!("{context}: {m}")),
        PrefillError::Serialization(m) => PrefillError::Serialization(format!("{context}: {m}")),
        PrefillError::Io(m) => PrefillError::Io(format!("{context}: {m}")),
        PrefillError::Connector(ConnectorError::InvalidResponse(m)) => {
            ConnectorError::InvalidResponse(format!("{context}: {m}")).into()
        }
        // Structured variants keep their payload untouched
        other @ (PrefillError::Connector(_) | PrefillError::MissingPrerequisite { .. }) => other,
        PrefillError::Other(m) => PrefillError::Other(format!("{context}: {m}")),
    }
}
