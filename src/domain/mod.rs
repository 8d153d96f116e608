//! Domain models and types for the prefill pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ResourceId`], [`CorrelationId`], [`ReplyTo`])
//! - **Card types** ([`CardType`], [`CardHandle`], [`CertRef`])
//! - **FHIR model** ([`fhir::Bundle`] and the resources it carries)
//! - **Error types** ([`PrefillError`], [`ConnectorError`], [`ErrorKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PrefillError>`]. The error's
//! [`ErrorKind`] tells a requester whether a card was missing or something
//! actually broke:
//!
//! ```rust
//! use prefill::domain::{CardType, ErrorKind, PrefillError};
//!
//! let err = PrefillError::MissingPrerequisite {
//!     card_type: CardType::Egk,
//!     record: "Patient",
//! };
//! assert_eq!(err.kind(), ErrorKind::MissingPrerequisite);
//! ```

pub mod card;
pub mod context;
pub mod errors;
pub mod fhir;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use card::{CardHandle, CardInfo, CardType, CertRef};
pub use errors::{ConnectorError, ErrorKind, PrefillError};
pub use ids::{CorrelationId, ReplyTo, ResourceId};
pub use result::Result;
