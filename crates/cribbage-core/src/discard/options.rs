use crate::model::card::Card;
use crate::model::round::{DEAL_SIZE, DISCARD_SIZE};
use crate::scoring::{HAND_SIZE, ScoreError, ensure_unique};
use serde::Serialize;

/// Number of ways to choose two discards from six cards.
pub const DISCARD_OPTIONS: usize = 15;

/// One way to split a six-card deal into a kept hand and two crib cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscardOption {
    /// Positions of the discards within the deal, `first < second`.
    pub indices: (usize, usize),
    /// Kept cards in deal order.
    pub kept: [Card; HAND_SIZE],
    pub discarded: [Card; DISCARD_SIZE],
}

/// Checks that `deal` holds six distinct cards.
pub fn validate_deal(deal: &[Card]) -> Result<[Card; DEAL_SIZE], ScoreError> {
    let cards: [Card; DEAL_SIZE] = deal
        .try_into()
        .map_err(|_| ScoreError::InvalidDealSize { len: deal.len() })?;
    ensure_unique(cards)?;
    Ok(cards)
}

/// All fifteen discard options in canonical `(i, j)` order with `i < j`.
pub fn enumerate_discards(deal: &[Card; DEAL_SIZE]) -> Vec<DiscardOption> {
    let mut options = Vec::with_capacity(DISCARD_OPTIONS);
    for first in 0..DEAL_SIZE {
        for second in (first + 1)..DEAL_SIZE {
            let mut kept = [deal[0]; HAND_SIZE];
            let positions = (0..DEAL_SIZE).filter(|idx| *idx != first && *idx != second);
            for (slot, idx) in positions.enumerate() {
                kept[slot] = deal[idx];
            }
            options.push(DiscardOption {
                indices: (first, second),
                kept,
                discarded: [deal[first], deal[second]],
            });
        }
    }
    options
}
