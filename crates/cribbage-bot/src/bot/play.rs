use super::card_list;
use cribbage_core::model::card::Card;
use cribbage_core::model::hand::Hand;
use cribbage_core::model::pegging::PeggingState;
use cribbage_core::scoring::pegging::{
    FIFTEEN, THIRTY_ONE, trailing_pair_count, trailing_run_length,
};
use serde::Serialize;
use tracing::{Level, event};

/// Priority classes for a pegging play, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayTier {
    FourOfAKind,
    /// Trailing run of five or more.
    LongRun,
    ThreeOfAKind,
    /// Trailing run of three or four.
    ShortRun,
    Pair,
    Fifteen,
    ThirtyOne,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayCandidate {
    pub card: Card,
    /// Position of the card in the player's hand.
    pub index: usize,
    pub tier: PlayTier,
    pub run: usize,
}

impl PlayCandidate {
    fn sort_key(&self) -> (PlayTier, std::cmp::Reverse<usize>, usize) {
        let run = match self.tier {
            PlayTier::LongRun | PlayTier::ShortRun => self.run,
            _ => 0,
        };
        (self.tier, std::cmp::Reverse(run), self.index)
    }
}

/// Rule-based pegging: take the strongest scoring play available.
pub struct PlayPlanner;

impl PlayPlanner {
    /// Picks a card to lay, or `None` when no unplayed card fits under 31.
    pub fn choose(hand: &Hand, pegging: &PeggingState) -> Option<Card> {
        let candidates = Self::candidates(hand, pegging);
        let chosen = candidates
            .iter()
            .min_by_key(|candidate| candidate.sort_key())
            .copied();
        log_play(&candidates, chosen, pegging);
        chosen.map(|candidate| candidate.card)
    }

    /// Every legal card with the tier it would reach, in hand order.
    pub fn candidates(hand: &Hand, pegging: &PeggingState) -> Vec<PlayCandidate> {
        hand.unplayed()
            .filter(|(_, card)| pegging.can_play(*card))
            .map(|(index, card)| classify(card, index, pegging))
            .collect()
    }
}

fn classify(card: Card, index: usize, pegging: &PeggingState) -> PlayCandidate {
    let mut sequence = pegging.current_sequence().to_vec();
    sequence.push(card);
    let total = pegging.total() + card.count_value();
    let matches = trailing_pair_count(&sequence);
    let run = if sequence.len() >= 3 {
        trailing_run_length(&sequence)
    } else {
        0
    };

    let tier = if matches >= 3 {
        PlayTier::FourOfAKind
    } else if run >= 5 {
        PlayTier::LongRun
    } else if matches == 2 {
        PlayTier::ThreeOfAKind
    } else if run >= 3 {
        PlayTier::ShortRun
    } else if matches == 1 {
        PlayTier::Pair
    } else if total == FIFTEEN {
        PlayTier::Fifteen
    } else if total == THIRTY_ONE {
        PlayTier::ThirtyOne
    } else {
        PlayTier::Fallback
    };

    PlayCandidate {
        card,
        index,
        tier,
        run,
    }
}

fn log_play(candidates: &[PlayCandidate], chosen: Option<PlayCandidate>, pegging: &PeggingState) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal: Vec<Card> = candidates.iter().map(|candidate| candidate.card).collect();
    let choice = chosen
        .map(|candidate| candidate.card.to_string())
        .unwrap_or_else(|| "go".to_string());
    let tier = chosen.map(|candidate| candidate.tier);

    event!(
        target: "cribbage_bot::play",
        Level::DEBUG,
        total = pegging.total(),
        since_reset = pegging.cards_since_reset(),
        legal_moves = %card_list(&legal),
        chosen = %choice,
        tier = ?tier,
    );
}
