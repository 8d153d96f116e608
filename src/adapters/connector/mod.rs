//! Konnektor integration
//!
//! The Konnektor is the gateway between the practice system and the card
//! terminals. Three of its SOAP services are used:
//!
//! - `EventService.GetCards` to find inserted cards
//! - `VSDService.ReadVSD` to read insurance data from the patient's card
//! - `CertificateService.ReadCardCertificate` to read card certificates

pub mod client;
pub mod context;
pub mod konnektor;
pub mod soap;
pub mod traits;

pub use client::ConnectorServices;
pub use context::{ConfiguredContextProvider, ConnectorContext, ContextProvider, RuntimeConfig};
pub use konnektor::KonnektorClient;
pub use traits::{CertificateService, EventService, RawInsuranceData, VsdService};
