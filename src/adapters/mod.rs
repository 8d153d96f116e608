//! External system integrations
//!
//! - [`connector`] - gematik Konnektor (EventService, VSDService,
//!   CertificateService)
//!
//! The pipeline only sees the traits in [`connector::traits`], so tests and
//! alternative transports plug in behind the same seams.

pub mod connector;
