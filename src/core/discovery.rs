//! Token discovery
//!
//! Finds the handle of the inserted card of each type. Only the first card
//! in the Konnektor's inventory order is used.

use crate::adapters::connector::{ConnectorContext, EventService};
use crate::domain::card::{CardHandle, CardType};
use crate::domain::context::ResultExt;
use crate::domain::Result;

/// Returns the handle of the first inserted card of `card_type`, if any
///
/// # Errors
///
/// Propagates connectivity errors and faults from the inventory query.
pub async fn first_card_of_type(
    events: &dyn EventService,
    card_type: CardType,
    ctx: &ConnectorContext,
) -> Result<Option<CardHandle>> {
    let cards = events
        .get_cards(ctx, card_type)
        .await
        .with_context(|| format!("Listing {card_type} cards"))?;

    tracing::debug!(
        card_type = %card_type,
        cards = cards.len(),
        "Card inventory read"
    );

    Ok(cards.into_iter().next().map(|card| card.handle))
}
