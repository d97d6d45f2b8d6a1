use crate::model::deck::Deck;
use crate::model::player::PlayerPosition;
use crate::model::round::{RoundError, RoundPhase, RoundState, ScoreEvent};
use crate::model::score::{GameStatus, ScoreBoard};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A game to 121: the scoreboard, the current deal and the shuffling rng.
#[derive(Debug, Clone)]
pub struct MatchState {
    scores: ScoreBoard,
    round_number: u32,
    current_round: RoundState,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    pub fn new(first_dealer: PlayerPosition) -> Result<Self, RoundError> {
        let seed: u64 = rand::random();
        Self::with_seed(first_dealer, seed)
    }

    pub fn with_seed(first_dealer: PlayerPosition, seed: u64) -> Result<Self, RoundError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        Self::from_parts(deck, first_dealer, rng, seed)
    }

    /// Starts from a prepared first deck; later deals shuffle from `seed`.
    pub fn with_deck(
        deck: Deck,
        first_dealer: PlayerPosition,
        seed: u64,
    ) -> Result<Self, RoundError> {
        Self::from_parts(deck, first_dealer, StdRng::seed_from_u64(seed), seed)
    }

    fn from_parts(
        deck: Deck,
        first_dealer: PlayerPosition,
        rng: StdRng,
        seed: u64,
    ) -> Result<Self, RoundError> {
        Ok(Self {
            scores: ScoreBoard::new(),
            round_number: 1,
            current_round: RoundState::deal(deck, first_dealer)?,
            rng,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.current_round.dealer()
    }

    pub fn status(&self) -> GameStatus {
        self.scores.status()
    }

    /// Pegs events in order and stops at the first one that wins the game.
    ///
    /// Returns how many events were applied alongside the resulting status.
    pub fn apply(&mut self, events: &[ScoreEvent]) -> (usize, GameStatus) {
        let mut applied = 0;
        for event in events {
            if self.scores.status().is_over() {
                break;
            }
            self.scores.add(event.seat, u32::from(event.points));
            applied += 1;
        }
        (applied, self.scores.status())
    }

    /// Deals the next round with the deal passing to the other player.
    pub fn finish_round_and_start_next(&mut self) -> Result<(), RoundError> {
        let phase = self.current_round.phase();
        if phase != RoundPhase::Complete {
            return Err(RoundError::WrongPhase {
                expected: RoundPhase::Complete,
                actual: phase,
            });
        }
        let next_dealer = self.current_round.dealer().other();
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(deck, next_dealer)?;
        self.round_number += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MatchState;
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::player::PlayerPosition;
    use crate::model::round::{RoundError, ScoreEvent, ScoreReason};
    use crate::model::score::GameStatus;

    #[test]
    fn same_seed_deals_same_cards() {
        let a = MatchState::with_seed(PlayerPosition::First, 99).unwrap();
        let b = MatchState::with_seed(PlayerPosition::First, 99).unwrap();
        assert_eq!(
            a.round().dealt(PlayerPosition::Second),
            b.round().dealt(PlayerPosition::Second)
        );
        assert_eq!(a.seed(), 99);
        assert_eq!(a.round_number(), 1);
    }

    #[test]
    fn prepared_deck_sets_the_first_deal() {
        let order: Vec<Card> = (0u8..13).filter_map(Card::from_id).collect();
        let state =
            MatchState::with_deck(Deck::stacked(order.clone()), PlayerPosition::Second, 7)
                .unwrap();
        assert_eq!(state.dealer(), PlayerPosition::Second);
        assert_eq!(state.round().dealt(PlayerPosition::First), &order[..6]);
        assert_eq!(state.round().dealt(PlayerPosition::Second), &order[6..12]);
        assert_eq!(state.seed(), 7);
        assert_eq!(state.round_number(), 1);
    }

    #[test]
    fn apply_stops_at_the_winning_event() {
        let mut state = MatchState::with_seed(PlayerPosition::First, 1).unwrap();
        state.scores_mut().set_totals([119, 118]);
        let events = [
            ScoreEvent {
                seat: PlayerPosition::Second,
                points: 4,
                reason: ScoreReason::LastCard,
            },
            ScoreEvent {
                seat: PlayerPosition::First,
                points: 8,
                reason: ScoreReason::LastCard,
            },
        ];
        let (applied, status) = state.apply(&events);
        assert_eq!(applied, 1);
        assert_eq!(status.winner(), Some(PlayerPosition::Second));
        assert_eq!(state.scores().score(PlayerPosition::First), 119);
        assert!(matches!(status, GameStatus::Won { winner_score: 122, .. }));
    }

    #[test]
    fn next_round_requires_complete_round() {
        let mut state = MatchState::with_seed(PlayerPosition::First, 5).unwrap();
        assert!(matches!(
            state.finish_round_and_start_next(),
            Err(RoundError::WrongPhase { .. })
        ));
        assert_eq!(state.dealer(), PlayerPosition::First);
    }
}
