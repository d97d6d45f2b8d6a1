//! The five counting rules, evaluated directly from cards.
//!
//! Every function accepts cards in any order. Fifteens, pairs and runs treat
//! the turn card like any other card, so callers pass the hand and the turn
//! together. Flush and nobs need to know which card is the turn.

use crate::model::card::Card;

/// Two points for every subset of two or more cards whose count values sum to 15.
pub fn fifteens(cards: &[Card]) -> u8 {
    let values: Vec<u8> = cards.iter().map(|card| card.count_value()).collect();
    subsets(values.len())
        .filter(|mask| mask.count_ones() >= 2)
        .filter(|&mask| picked(&values, mask).map(u32::from).sum::<u32>() == 15)
        .count() as u8
        * 2
}

/// `k * (k - 1)` points for every group of `k` cards sharing a face value.
pub fn pairs(cards: &[Card]) -> u8 {
    let mut faces: Vec<u8> = cards.iter().map(|card| card.face_value()).collect();
    faces.sort_unstable();
    faces
        .chunk_by(|a, b| a == b)
        .map(|group| (group.len() * (group.len() - 1)) as u8)
        .sum()
}

/// Points for the longest runs of three or more consecutive face values.
///
/// Only the longest run length counts; every distinct selection of cards
/// forming a run of that length scores its length, so duplicated faces
/// produce double and triple runs.
pub fn runs(cards: &[Card]) -> u8 {
    let mut faces: Vec<u8> = cards.iter().map(|card| card.face_value()).collect();
    faces.sort_unstable();

    for length in (3..=faces.len()).rev() {
        let found = subsets(faces.len())
            .filter(|mask| mask.count_ones() as usize == length)
            .filter(|&mask| is_consecutive(picked(&faces, mask)))
            .count();
        if found > 0 {
            return (found * length) as u8;
        }
    }
    0
}

/// Four points when every hand card shares a suit, five when the turn matches too.
///
/// Without a turn card the four-card flush still scores four.
pub fn flush(hand: &[Card], turn: Option<Card>) -> u8 {
    let Some((first, rest)) = hand.split_first() else {
        return 0;
    };
    let suit = first.suit();
    if rest.iter().any(|card| card.suit() != suit) {
        return 0;
    }
    match turn {
        Some(turn) if turn.suit() == suit => hand.len() as u8 + 1,
        _ => hand.len() as u8,
    }
}

/// One point for holding the jack of the turn card's suit.
pub fn nobs(hand: &[Card], turn: Option<Card>) -> u8 {
    match turn {
        Some(turn) if hand.iter().any(|card| card.is_jack() && card.suit() == turn.suit()) => 1,
        _ => 0,
    }
}

fn subsets(len: usize) -> impl Iterator<Item = u32> {
    1u32..(1u32 << len)
}

fn picked(values: &[u8], mask: u32) -> impl Iterator<Item = u8> + '_ {
    values
        .iter()
        .enumerate()
        .filter(move |(idx, _)| mask & (1 << idx) != 0)
        .map(|(_, value)| *value)
}

fn is_consecutive(mut faces: impl Iterator<Item = u8>) -> bool {
    let Some(mut previous) = faces.next() else {
        return false;
    };
    for face in faces {
        if face != previous + 1 {
            return false;
        }
        previous = face;
    }
    true
}
