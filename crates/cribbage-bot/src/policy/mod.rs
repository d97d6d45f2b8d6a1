mod evaluated;
mod random;

pub use evaluated::{EvaluatedPolicy, PeggingStyle};
pub use random::RandomPolicy;

use cribbage_core::discard::DiscardOption;
use cribbage_core::model::card::Card;
use cribbage_core::model::hand::Hand;
use cribbage_core::model::pegging::PeggingState;
use cribbage_core::model::player::PlayerPosition;
use cribbage_core::model::round::RoundState;
use cribbage_core::model::score::ScoreBoard;
use cribbage_core::scoring::ScoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("discard evaluation failed: {0}")]
    Score(#[from] ScoreError),
}

/// Context provided to policies when it is their turn to peg.
pub struct PlayContext<'a> {
    pub seat: PlayerPosition,
    pub dealer: PlayerPosition,
    pub hand: &'a Hand,
    pub pegging: &'a PeggingState,
    pub turn_card: Option<Card>,
    pub scores: &'a ScoreBoard,
}

impl<'a> PlayContext<'a> {
    pub fn from_round(round: &'a RoundState, scores: &'a ScoreBoard, seat: PlayerPosition) -> Self {
        Self {
            seat,
            dealer: round.dealer(),
            hand: round.hand(seat),
            pegging: round.pegging(),
            turn_card: round.turn_card(),
            scores,
        }
    }

    /// Unplayed cards that keep the count at or under 31, in hand order.
    pub fn legal_plays(&self) -> Vec<Card> {
        self.hand
            .unplayed()
            .map(|(_, card)| card)
            .filter(|&card| self.pegging.can_play(card))
            .collect()
    }
}

/// A player: chooses the crib discards and then each pegging play.
pub trait Policy: Send {
    /// Splits a six-card deal into kept cards and two crib cards.
    fn choose_discard(
        &mut self,
        deal: &[Card],
        owns_crib: bool,
    ) -> Result<DiscardOption, PolicyError>;

    /// Chooses a card to lay, or `None` to call go.
    fn choose_play(&mut self, ctx: &PlayContext<'_>) -> Option<Card>;
}

#[cfg(test)]
mod tests {
    use super::PlayContext;
    use cribbage_core::model::deck::Deck;
    use cribbage_core::model::player::PlayerPosition;
    use cribbage_core::model::round::RoundState;
    use cribbage_core::model::score::ScoreBoard;

    #[test]
    fn context_reads_from_round() {
        let round = RoundState::deal(Deck::shuffled_with_seed(3), PlayerPosition::First).unwrap();
        let scores = ScoreBoard::new();
        let ctx = PlayContext::from_round(&round, &scores, PlayerPosition::Second);
        assert_eq!(ctx.dealer, PlayerPosition::First);
        assert_eq!(ctx.turn_card, None);
        // No hand until the discards are in.
        assert!(ctx.legal_plays().is_empty());
        assert!(ctx.hand.is_empty());
    }
}
