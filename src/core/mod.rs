//! Core prefill logic
//!
//! # Modules
//!
//! - [`discovery`] - Find the inserted card of each type
//! - [`vsd`] - Decode insurance data read from the patient's card
//! - [`certificate`] - Extract subject attributes from card certificates
//! - [`synthesize`] - Build the FHIR records
//! - [`bundle`] - Compose the records into the prescription bundle
//! - [`pipeline`] - Run the steps above against a Konnektor
//! - [`service`] - Asynchronous request handling and notifications
//!
//! # Workflow
//!
//! 1. **Context**: Acquire the Konnektor context, applying request overrides
//! 2. **Discover**: Look up insurance, institution and professional cards
//! 3. **Insurance card**: Read and decode VSD into Patient and Coverage
//! 4. **Professional card**: Read the C.QES certificate into a Practitioner
//! 5. **Institution card**: Read the C.AUT certificate into an Organization
//! 6. **Compose**: Add placeholder Medication and MedicationRequest, bundle
//! 7. **Notify**: Publish the bundle or the failure
//!
//! # Example
//!
//! ```rust,no_run
//! use prefill::adapters::connector::ConnectorServices;
//! use prefill::config::load_config;
//! use prefill::core::{Notification, PrefillPipeline, PrefillRequest, PrefillService};
//! use prefill::domain::{CorrelationId, ReplyTo};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("prefill.toml")?;
//! let services = ConnectorServices::from_config(&config.connector)?;
//!
//! let (tx, mut rx) = tokio::sync::mpsc::channel(8);
//! let service = PrefillService::new(PrefillPipeline::new(services), tx);
//!
//! service.submit(PrefillRequest::new(CorrelationId::generate(), ReplyTo::new("cli")));
//!
//! if let Some(Notification::BundlesReady { bundles }) = rx.recv().await {
//!     println!("{}", bundles[0].to_json_pretty()?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod certificate;
pub mod discovery;
pub mod pipeline;
pub mod service;
pub mod synthesize;
pub mod vsd;

pub use bundle::BundleParts;
pub use certificate::{split_street_and_number, CertificateAttributes, DnAttribute, StreetAddress};
pub use pipeline::PrefillPipeline;
pub use service::{
    FailureNotification, Notification, PrefillRequest, PrefillRun, PrefillService, RunState,
};
pub use vsd::{decode_insurance_data, DecodedInsuranceData};
