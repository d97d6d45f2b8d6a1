//! Hand and pegging scoring.
//!
//! [`HandScorer`] combines the five counting rules from [`rules`] and memoises
//! each of them in a [`ScoreCache`] keyed by the sorted attribute the rule
//! depends on. [`pegging::score_last_play`] scores a single card laid during
//! the play.

pub mod cache;
pub mod hand;
pub mod pegging;
pub mod rules;

pub use cache::{CacheStats, HandCache, ScoreCache};
pub use hand::{HandScorer, ScoreBreakdown, ScorerCacheStats, ScorerConfig};
pub use pegging::{PlayScore, score_last_play};

use crate::model::card::Card;
use thiserror::Error;

/// Cards kept in a counted hand or crib.
pub const HAND_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("scoring needs 4 hand cards plus an optional turn card, got {len} cards")]
    InvalidHandSize { len: usize },
    #[error("a deal must hold exactly 6 cards, got {len}")]
    InvalidDealSize { len: usize },
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("running total {total} exceeds 31")]
    TotalExceedsThirtyOne { total: u8 },
    #[error("cache key {key:?} has a component outside 0..{radix}")]
    CacheKeyOutOfBounds { key: Vec<u8>, radix: usize },
}

/// Rejects any card identifier that appears twice.
pub(crate) fn ensure_unique<I>(cards: I) -> Result<(), ScoreError>
where
    I: IntoIterator<Item = Card>,
{
    let mut seen = 0u64;
    for card in cards {
        let bit = 1u64 << card.id();
        if seen & bit != 0 {
            return Err(ScoreError::DuplicateCard(card));
        }
        seen |= bit;
    }
    Ok(())
}
