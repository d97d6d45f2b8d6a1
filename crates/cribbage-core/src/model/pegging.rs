use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::scoring::pegging::{PlayScore, THIRTY_ONE, score_last_play};
use crate::scoring::ScoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeggingError {
    #[error("playing {card} would take the count past 31 (currently {total})")]
    ExceedsThirtyOne { card: Card, total: u8 },
    #[error("{0} has already been played this hand")]
    AlreadyPlayed(Card),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// What a call of "go" did to the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoOutcome {
    /// The count entered the go state; the opponent pegs one.
    Point { to: PlayerPosition },
    /// The go state was already entered; nothing is scored.
    Pass,
    /// Two goes in a row: the count starts again from zero.
    CountReset,
}

/// The running count during the play.
///
/// `history` keeps every card played this hand; the last `since_reset` of
/// them form the sequence that pairs and runs are scored against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeggingState {
    history: Vec<Card>,
    since_reset: usize,
    total: u8,
    last_play_was_go: bool,
    in_go_state: bool,
}

impl PeggingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Card] {
        &self.history
    }

    /// Cards played since the count last reset.
    pub fn current_sequence(&self) -> &[Card] {
        &self.history[self.history.len() - self.since_reset..]
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn cards_since_reset(&self) -> usize {
        self.since_reset
    }

    pub fn in_go_state(&self) -> bool {
        self.in_go_state
    }

    pub fn last_play_was_go(&self) -> bool {
        self.last_play_was_go
    }

    pub fn can_play(&self, card: Card) -> bool {
        self.total + card.count_value() <= THIRTY_ONE && !self.history.contains(&card)
    }

    /// Lays `card` on the count and scores it. Reaching 31 resets the count.
    pub fn play(&mut self, card: Card) -> Result<PlayScore, PeggingError> {
        if self.history.contains(&card) {
            return Err(PeggingError::AlreadyPlayed(card));
        }
        let total = self.total + card.count_value();
        if total > THIRTY_ONE {
            return Err(PeggingError::ExceedsThirtyOne {
                card,
                total: self.total,
            });
        }

        self.last_play_was_go = false;
        self.history.push(card);
        self.since_reset += 1;
        self.total = total;

        let score = score_last_play(self.current_sequence(), total)?;
        if score.reaches_thirty_one() {
            self.reset_count();
        }
        Ok(score)
    }

    /// Records that `seat` cannot play.
    ///
    /// The first go after a card scores a point for the opponent unless the
    /// count is already in the go state. A go straight after another go
    /// resets the count and leaves the go state.
    pub fn go(&mut self, seat: PlayerPosition) -> GoOutcome {
        if self.last_play_was_go {
            self.reset_count();
            self.last_play_was_go = false;
            self.in_go_state = false;
            return GoOutcome::CountReset;
        }

        let outcome = if self.in_go_state {
            GoOutcome::Pass
        } else {
            GoOutcome::Point { to: seat.other() }
        };
        self.last_play_was_go = true;
        self.in_go_state = true;
        outcome
    }

    fn reset_count(&mut self) {
        self.total = 0;
        self.since_reset = 0;
    }
}
