//! # Prefill - KBV e-prescription bundles from health cards
//!
//! Reads the cards inserted at a practice workplace through a gematik
//! Konnektor and assembles a pre-populated KBV e-prescription FHIR bundle
//! for the prescriber to complete and sign.
//!
//! ## Overview
//!
//! - **Discovers** the insurance (EGK), institution (SMC-B) and professional
//!   (HBA) cards present
//! - **Decodes** the insurance master data (VSD) from the patient's card
//! - **Extracts** prescriber and institution details from card certificates
//! - **Composes** Patient, Coverage, Practitioner, Organization, Medication and
//!   MedicationRequest into one referentially sound document bundle
//! - **Notifies** the requester with the bundle or the reason it failed
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The assembly pipeline and request service
//! - [`adapters`] - Konnektor SOAP integration
//! - [`domain`] - Card types, FHIR model, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`xml`] - Namespace normalization shared by SOAP and VSD parsing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prefill::adapters::connector::ConnectorServices;
//! use prefill::config::load_config;
//! use prefill::core::PrefillPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("prefill.toml")?;
//!     let services = ConnectorServices::from_config(&config.connector)?;
//!
//!     let bundle = PrefillPipeline::new(services).assemble(None).await?;
//!     println!("{}", bundle.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Missing cards
//!
//! An institution card is optional; without it the bundle simply has no
//! Organization. Without an insurance card or a professional card the run
//! fails with [`domain::PrefillError::MissingPrerequisite`]:
//!
//! ```rust
//! use prefill::domain::{CardType, ErrorKind, PrefillError};
//!
//! let err = PrefillError::MissingPrerequisite {
//!     card_type: CardType::Hba,
//!     record: "Practitioner",
//! };
//! assert_eq!(err.kind(), ErrorKind::MissingPrerequisite);
//! assert!(err.is_missing_card());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod xml;
