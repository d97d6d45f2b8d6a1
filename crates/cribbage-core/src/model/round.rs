use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::Hand;
use crate::model::pegging::{GoOutcome, PeggingError, PeggingState};
use crate::model::player::PlayerPosition;
use crate::scoring::{HandScorer, PlayScore, ScoreBreakdown, ScoreError};
use serde::Serialize;
use thiserror::Error;

pub const DEAL_SIZE: usize = 6;
pub const DISCARD_SIZE: usize = 2;
pub const HIS_HEELS_POINTS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Discarding,
    Pegging,
    Counting,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreReason {
    /// Dealer turned a jack.
    HisHeels,
    Play { score: PlayScore },
    Go,
    LastCard,
    Hand { breakdown: ScoreBreakdown },
    Crib { breakdown: ScoreBreakdown },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreEvent {
    pub seat: PlayerPosition,
    pub points: u8,
    pub reason: ScoreReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("action needs the {expected:?} phase but the round is in {actual:?}")]
    WrongPhase {
        expected: RoundPhase,
        actual: RoundPhase,
    },
    #[error("expected {expected} to act, got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{seat} has already discarded")]
    AlreadyDiscarded { seat: PlayerPosition },
    #[error("both players must discard before the turn card is cut")]
    DiscardsIncomplete,
    #[error("cannot discard {0} twice")]
    DuplicateDiscard(Card),
    #[error("{seat} does not hold {card}")]
    CardNotHeld { seat: PlayerPosition, card: Card },
    #[error("{seat} called go while holding a playable card")]
    IllegalGo { seat: PlayerPosition },
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Pegging(#[from] PeggingError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// One deal: discarding to the crib, the cut, the play and the count.
///
/// The non-dealer (pone) leads the play and counts first; the dealer counts
/// hand then crib.
#[derive(Debug, Clone)]
pub struct RoundState {
    dealer: PlayerPosition,
    deck: Deck,
    dealt: [Vec<Card>; 2],
    hands: [Hand; 2],
    discarded: [bool; 2],
    crib: Vec<Card>,
    turn_card: Option<Card>,
    pegging: PeggingState,
    to_play: PlayerPosition,
    phase: RoundPhase,
}

impl RoundState {
    /// Deals six cards to each player, pone first.
    pub fn deal(mut deck: Deck, dealer: PlayerPosition) -> Result<Self, RoundError> {
        let pone = dealer.other();
        let mut dealt: [Vec<Card>; 2] = Default::default();
        dealt[pone.index()] = deck.draw(DEAL_SIZE)?;
        dealt[dealer.index()] = deck.draw(DEAL_SIZE)?;
        Ok(Self {
            dealer,
            deck,
            dealt,
            hands: Default::default(),
            discarded: [false; 2],
            crib: Vec::with_capacity(DISCARD_SIZE * 2),
            turn_card: None,
            pegging: PeggingState::new(),
            to_play: pone,
            phase: RoundPhase::Discarding,
        })
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.dealer
    }

    pub fn pone(&self) -> PlayerPosition {
        self.dealer.other()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The six cards `seat` was dealt.
    pub fn dealt(&self, seat: PlayerPosition) -> &[Card] {
        &self.dealt[seat.index()]
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn has_discarded(&self, seat: PlayerPosition) -> bool {
        self.discarded[seat.index()]
    }

    pub fn crib(&self) -> &[Card] {
        &self.crib
    }

    pub fn turn_card(&self) -> Option<Card> {
        self.turn_card
    }

    pub fn pegging(&self) -> &PeggingState {
        &self.pegging
    }

    /// The seat expected to play or call go next.
    pub fn to_play(&self) -> PlayerPosition {
        self.to_play
    }

    pub fn remaining_cards(&self) -> usize {
        self.deck.remaining()
    }

    /// Unplayed cards `seat` may lay without passing 31.
    pub fn legal_plays(&self, seat: PlayerPosition) -> Vec<Card> {
        self.hands[seat.index()]
            .unplayed()
            .map(|(_, card)| card)
            .filter(|&card| self.pegging.can_play(card))
            .collect()
    }

    pub fn submit_discard(
        &mut self,
        seat: PlayerPosition,
        cards: [Card; DISCARD_SIZE],
    ) -> Result<(), RoundError> {
        self.expect_phase(RoundPhase::Discarding)?;
        if self.discarded[seat.index()] {
            return Err(RoundError::AlreadyDiscarded { seat });
        }
        if cards[0] == cards[1] {
            return Err(RoundError::DuplicateDiscard(cards[0]));
        }
        let dealt = &self.dealt[seat.index()];
        if let Some(&card) = cards.iter().find(|card| !dealt.contains(card)) {
            return Err(RoundError::CardNotHeld { seat, card });
        }

        let kept: Vec<Card> = dealt
            .iter()
            .copied()
            .filter(|card| !cards.contains(card))
            .collect();
        self.hands[seat.index()] = Hand::with_cards(kept);
        self.crib.extend_from_slice(&cards);
        self.discarded[seat.index()] = true;
        Ok(())
    }

    /// Cuts the turn card once both discards are in. A jack scores his heels
    /// for the dealer.
    pub fn cut_turn(&mut self) -> Result<Vec<ScoreEvent>, RoundError> {
        self.expect_phase(RoundPhase::Discarding)?;
        if !self.discarded.iter().all(|done| *done) {
            return Err(RoundError::DiscardsIncomplete);
        }
        let turn = self.deck.draw_one()?;
        self.turn_card = Some(turn);
        self.phase = RoundPhase::Pegging;
        self.to_play = self.pone();

        let mut events = Vec::new();
        if turn.is_jack() {
            events.push(ScoreEvent {
                seat: self.dealer,
                points: HIS_HEELS_POINTS,
                reason: ScoreReason::HisHeels,
            });
        }
        Ok(events)
    }

    /// Plays `card` for `seat`, or calls go when `card` is `None`.
    ///
    /// Go is only accepted when the seat has no legal card. The play ends
    /// once all eight cards are down; whoever laid the last one pegs one.
    pub fn play(
        &mut self,
        seat: PlayerPosition,
        card: Option<Card>,
    ) -> Result<Vec<ScoreEvent>, RoundError> {
        self.expect_phase(RoundPhase::Pegging)?;
        if seat != self.to_play {
            return Err(RoundError::OutOfTurn {
                expected: self.to_play,
                actual: seat,
            });
        }

        let mut events = Vec::new();
        match card {
            None => {
                if !self.legal_plays(seat).is_empty() {
                    return Err(RoundError::IllegalGo { seat });
                }
                if let GoOutcome::Point { to } = self.pegging.go(seat) {
                    events.push(ScoreEvent {
                        seat: to,
                        points: 1,
                        reason: ScoreReason::Go,
                    });
                }
            }
            Some(card) => {
                let hand = &self.hands[seat.index()];
                if !hand.contains(card) {
                    return Err(RoundError::CardNotHeld { seat, card });
                }
                if hand.is_played(card) {
                    return Err(PeggingError::AlreadyPlayed(card).into());
                }
                let score = self.pegging.play(card)?;
                self.hands[seat.index()].mark_played(card);
                if score.points() > 0 {
                    events.push(ScoreEvent {
                        seat,
                        points: score.points(),
                        reason: ScoreReason::Play { score },
                    });
                }
                if self.all_cards_played() {
                    events.push(ScoreEvent {
                        seat,
                        points: 1,
                        reason: ScoreReason::LastCard,
                    });
                    self.phase = RoundPhase::Counting;
                }
            }
        }

        self.to_play = seat.other();
        Ok(events)
    }

    /// Counts pone's hand, the dealer's hand and the crib, in that order.
    /// Zero-point counts are reported too.
    pub fn count(&mut self, scorer: &mut HandScorer) -> Result<Vec<ScoreEvent>, RoundError> {
        self.expect_phase(RoundPhase::Counting)?;
        let turn = self.turn_card;
        let pone = self.pone();

        let pone_hand = scorer.breakdown(self.hands[pone.index()].cards(), turn)?;
        let dealer_hand = scorer.breakdown(self.hands[self.dealer.index()].cards(), turn)?;
        let crib = scorer.breakdown(&self.crib, turn)?;
        self.phase = RoundPhase::Complete;

        Ok(vec![
            ScoreEvent {
                seat: pone,
                points: pone_hand.total(),
                reason: ScoreReason::Hand {
                    breakdown: pone_hand,
                },
            },
            ScoreEvent {
                seat: self.dealer,
                points: dealer_hand.total(),
                reason: ScoreReason::Hand {
                    breakdown: dealer_hand,
                },
            },
            ScoreEvent {
                seat: self.dealer,
                points: crib.total(),
                reason: ScoreReason::Crib { breakdown: crib },
            },
        ])
    }

    fn all_cards_played(&self) -> bool {
        self.hands.iter().all(|hand| hand.unplayed_count() == 0)
    }

    fn expect_phase(&self, expected: RoundPhase) -> Result<(), RoundError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RoundError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundError, RoundPhase, RoundState, ScoreEvent, ScoreReason};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::player::PlayerPosition;
    use crate::scoring::HandScorer;

    fn card(id: u8) -> Card {
        Card::from_id(id).unwrap()
    }

    /// Pone is dealt hearts A..6, dealer spades A..6, then the turn card.
    fn stacked(turn: u8) -> RoundState {
        let mut order: Vec<Card> = (0u8..6).map(card).collect();
        order.extend((39u8..45).map(card));
        order.push(card(turn));
        RoundState::deal(Deck::stacked(order), PlayerPosition::First).unwrap()
    }

    fn discard_all(round: &mut RoundState) {
        round
            .submit_discard(PlayerPosition::Second, [card(4), card(5)])
            .unwrap();
        round
            .submit_discard(PlayerPosition::First, [card(43), card(44)])
            .unwrap();
    }

    #[test]
    fn pone_is_dealt_first_and_leads() {
        let round = stacked(20);
        assert_eq!(round.pone(), PlayerPosition::Second);
        assert_eq!(round.dealt(PlayerPosition::Second)[0], card(0));
        assert_eq!(round.dealt(PlayerPosition::First)[0], card(39));
        assert_eq!(round.to_play(), PlayerPosition::Second);
        assert_eq!(round.remaining_cards(), 1);
    }

    #[test]
    fn discards_must_come_from_the_deal() {
        let mut round = stacked(20);
        let err = round
            .submit_discard(PlayerPosition::Second, [card(0), card(39)])
            .unwrap_err();
        assert_eq!(
            err,
            RoundError::CardNotHeld {
                seat: PlayerPosition::Second,
                card: card(39)
            }
        );
        assert_eq!(
            round.submit_discard(PlayerPosition::Second, [card(0), card(0)]),
            Err(RoundError::DuplicateDiscard(card(0)))
        );
        round
            .submit_discard(PlayerPosition::Second, [card(4), card(5)])
            .unwrap();
        assert!(matches!(
            round.submit_discard(PlayerPosition::Second, [card(0), card(1)]),
            Err(RoundError::AlreadyDiscarded { .. })
        ));
        assert_eq!(round.cut_turn(), Err(RoundError::DiscardsIncomplete));
    }

    #[test]
    fn jack_turn_scores_his_heels_for_dealer() {
        let mut round = stacked(10);
        discard_all(&mut round);
        let events = round.cut_turn().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].seat, PlayerPosition::First);
        assert_eq!(events[0].points, 2);
        assert_eq!(events[0].reason, ScoreReason::HisHeels);
        assert_eq!(round.phase(), RoundPhase::Pegging);
    }

    #[test]
    fn go_is_refused_while_a_card_is_playable() {
        let mut round = stacked(20);
        discard_all(&mut round);
        round.cut_turn().unwrap();
        assert_eq!(
            round.play(PlayerPosition::Second, None),
            Err(RoundError::IllegalGo {
                seat: PlayerPosition::Second
            })
        );
        assert!(matches!(
            round.play(PlayerPosition::First, Some(card(39))),
            Err(RoundError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn go_pegs_once_then_resets_the_count() {
        // Both keep only ten-count cards, so nobody can play at 30.
        let mut order: Vec<Card> = [0u8, 1, 9, 10, 11, 12].into_iter().map(card).collect();
        order.extend([39u8, 40, 48, 49, 50, 51].into_iter().map(card));
        order.push(card(20));
        let mut round = RoundState::deal(Deck::stacked(order), PlayerPosition::First).unwrap();

        assert!(!round.has_discarded(PlayerPosition::Second));
        round
            .submit_discard(PlayerPosition::Second, [card(0), card(1)])
            .unwrap();
        assert!(round.has_discarded(PlayerPosition::Second));
        assert!(!round.has_discarded(PlayerPosition::First));
        round
            .submit_discard(PlayerPosition::First, [card(39), card(40)])
            .unwrap();
        round.cut_turn().unwrap();

        // 10H, KS, JH: thirty.
        for (seat, id) in [
            (PlayerPosition::Second, 9),
            (PlayerPosition::First, 51),
            (PlayerPosition::Second, 10),
        ] {
            assert!(round.play(seat, Some(card(id))).unwrap().is_empty());
        }
        assert_eq!(round.pegging().total(), 30);
        assert!(round.legal_plays(PlayerPosition::First).is_empty());

        let events = round.play(PlayerPosition::First, None).unwrap();
        assert_eq!(
            events,
            vec![ScoreEvent {
                seat: PlayerPosition::Second,
                points: 1,
                reason: ScoreReason::Go,
            }]
        );

        // Pone cannot play either: the count resets with nothing pegged.
        assert!(round.play(PlayerPosition::Second, None).unwrap().is_empty());
        assert_eq!(round.pegging().total(), 0);
        assert_eq!(round.to_play(), PlayerPosition::First);

        // QS, QH (pair), JS: thirty again, and this time pone is stuck.
        round.play(PlayerPosition::First, Some(card(50))).unwrap();
        let pair = round.play(PlayerPosition::Second, Some(card(11))).unwrap();
        assert_eq!(pair.len(), 1);
        assert_eq!(pair[0].points, 2);
        round.play(PlayerPosition::First, Some(card(49))).unwrap();
        assert_eq!(round.pegging().total(), 30);

        let events = round.play(PlayerPosition::Second, None).unwrap();
        assert_eq!(
            events,
            vec![ScoreEvent {
                seat: PlayerPosition::First,
                points: 1,
                reason: ScoreReason::Go,
            }]
        );
        assert_eq!(round.phase(), RoundPhase::Pegging);
    }

    #[test]
    fn full_round_reaches_complete() {
        let mut round = stacked(20);
        discard_all(&mut round);
        round.cut_turn().unwrap();

        // Alternate A..4 of hearts and spades: every card pairs the one before.
        let mut pegged = [0u32; 2];
        for step in 0..4u8 {
            for (seat, id) in [
                (PlayerPosition::Second, step),
                (PlayerPosition::First, 39 + step),
            ] {
                for event in round.play(seat, Some(card(id))).unwrap() {
                    pegged[event.seat.index()] += u32::from(event.points);
                }
            }
        }
        assert_eq!(round.phase(), RoundPhase::Counting);
        // Dealer pairs four times and takes the last card.
        assert_eq!(pegged[PlayerPosition::First.index()], 9);

        let mut scorer = HandScorer::default();
        let events = round.count(&mut scorer).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].seat, PlayerPosition::Second);
        assert!(matches!(events[2].reason, ScoreReason::Crib { .. }));
        assert_eq!(round.phase(), RoundPhase::Complete);
    }
}
