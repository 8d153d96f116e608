//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers that flow through
//! a prefill run: record ids inside the bundle and the opaque references a
//! requester attaches to its request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Record identifier newtype wrapper
///
/// Every synthesized record receives a fresh UUID v4 at construction, so two
/// runs never share an identifier.
///
/// # Examples
///
/// ```
/// use prefill::domain::ids::ResourceId;
///
/// let a = ResourceId::generate();
/// let b = ResourceId::generate();
/// assert_ne!(a, b);
/// assert_eq!(a.as_str().len(), 36);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Generates a new random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a ResourceId from an existing string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ResourceId)` if the ID is non-empty, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Resource ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Correlation reference attached to a prefill request
///
/// Opaque to the pipeline; carried unchanged into the failure notification so
/// the requester can match it to its request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Creates a new CorrelationId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random correlation id for requests that didn't bring one
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the correlation id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Reply-routing reference attached to a prefill request
///
/// Identifies where the requester expects the answer, e.g. a websocket
/// session. The pipeline never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyTo(String);

impl ReplyTo {
    /// Creates a new ReplyTo from a string
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    /// Returns the reply target as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplyTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReplyTo {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
