//! Konnektor service trait definitions
//!
//! These traits abstract the three Konnektor web services the pipeline
//! consumes. [`KonnektorClient`](super::KonnektorClient) implements all of
//! them over SOAP; tests substitute in-memory fakes.

use super::context::ConnectorContext;
use crate::domain::card::{CardHandle, CardInfo, CardType, CertRef};
use crate::domain::Result;
use async_trait::async_trait;

/// The three gzip-compressed VSD segments as read from an insurance card
///
/// An empty segment means the Konnektor did not return it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInsuranceData {
    /// `PersoenlicheVersichertendaten`
    pub personal: Vec<u8>,
    /// `AllgemeineVersicherungsdaten`
    pub general: Vec<u8>,
    /// `GeschuetzteVersichertendaten`
    pub protected: Vec<u8>,
}

/// Card inventory
///
/// # Example
///
/// ```no_run
/// use prefill::adapters::connector::{ConnectorContext, EventService};
/// use prefill::domain::CardType;
///
/// # async fn example(events: &dyn EventService, ctx: &ConnectorContext) -> prefill::domain::Result<()> {
/// let cards = events.get_cards(ctx, CardType::Egk).await?;
/// println!("{} insurance cards inserted", cards.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait EventService: Send + Sync {
    /// Lists the inserted cards of one type, in inventory order
    async fn get_cards(&self, ctx: &ConnectorContext, card_type: CardType)
        -> Result<Vec<CardInfo>>;
}

/// Insurance master data access
#[async_trait]
pub trait VsdService: Send + Sync {
    /// Reads the three VSD segments from an insurance card
    ///
    /// The institution card, when present, authorizes the read.
    async fn read_vsd(
        &self,
        egk: &CardHandle,
        smcb: Option<&CardHandle>,
        ctx: &ConnectorContext,
    ) -> Result<RawInsuranceData>;
}

/// Card certificate access
#[async_trait]
pub trait CertificateService: Send + Sync {
    /// Reads the DER-encoded certificate for one role of a card
    async fn read_card_certificate(
        &self,
        card: &CardHandle,
        cert_ref: CertRef,
        ctx: &ConnectorContext,
    ) -> Result<Vec<u8>>;
}
