mod discard;
mod play;

pub use discard::DiscardPlanner;
pub use play::{PlayCandidate, PlayPlanner, PlayTier};

use cribbage_core::model::card::Card;

fn card_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
