//! Domain error types
//!
//! This module defines the error hierarchy for the prefill pipeline.
//! Errors are domain-specific and don't expose third-party types.

use super::card::CardType;
use thiserror::Error;

/// Main prefill error type
///
/// This is the primary error type used throughout the application. Every
/// variant belongs to exactly one [`ErrorKind`], which is what a requester
/// uses to decide how to present a failed run.
#[derive(Debug, Error)]
pub enum PrefillError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Konnektor-related errors (transport or service fault)
    #[error("Konnektor error: {0}")]
    Connector(#[from] ConnectorError),

    /// One of the insurance data segments could not be decompressed or parsed
    #[error("Insurance data unreadable: {0}")]
    InsuranceDataUnreadable(String),

    /// A card certificate could not be retrieved or decoded
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// A card required to build the prescription was not inserted
    #[error("{record} cannot be created: no {card_type} card present")]
    MissingPrerequisite {
        /// Card type that was absent
        card_type: CardType,
        /// Record that could not be built without it
        record: &'static str,
    },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Coarse error classification reported alongside failure notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A Konnektor call failed at transport or service level
    Connectivity,
    /// A compressed or structured payload could not be parsed
    Decode,
    /// A certificate could not be read or decoded
    Cryptographic,
    /// A required card was not present
    MissingPrerequisite,
    /// Invalid configuration
    Configuration,
    /// Anything else
    Internal,
}

impl PrefillError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrefillError::Connector(ConnectorError::CertificateUnavailable(_)) => {
                ErrorKind::Cryptographic
            }
            PrefillError::Connector(_) => ErrorKind::Connectivity,
            PrefillError::InsuranceDataUnreadable(_) => ErrorKind::Decode,
            PrefillError::Certificate(_) => ErrorKind::Cryptographic,
            PrefillError::MissingPrerequisite { .. } => ErrorKind::MissingPrerequisite,
            PrefillError::Configuration(_) => ErrorKind::Configuration,
            PrefillError::Validation(_)
            | PrefillError::Serialization(_)
            | PrefillError::Io(_)
            | PrefillError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if the error was caused by an absent card
    pub fn is_missing_card(&self) -> bool {
        self.kind() == ErrorKind::MissingPrerequisite
    }
}

/// Konnektor-specific errors
///
/// Errors that occur when talking to the Konnektor SOAP services.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Failed to connect to the Konnektor
    #[error("Failed to connect to Konnektor: {0}")]
    ConnectionFailed(String),

    /// The service answered with a SOAP fault
    #[error("SOAP fault from {operation}: {message}")]
    Fault { operation: String, message: String },

    /// Invalid response from the Konnektor
    #[error("Invalid response from Konnektor: {0}")]
    InvalidResponse(String),

    /// Server error (5xx) without a parseable fault
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The certificate service answered but carried no usable certificate
    #[error("Certificate unavailable: {0}")]
    CertificateUnavailable(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PrefillError {
    fn from(err: std::io::Error) -> Self {
        PrefillError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PrefillError {
    fn from(err: serde_json::Error) -> Self {
        PrefillError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PrefillError {
    fn from(err: toml::de::Error) -> Self {
        PrefillError::Configuration(format!("TOML parse error: {err}"))
    }
}
