use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DECK_SIZE: usize = 52;

/// A card identified by `suit * 13 + (rank - 1)`.
///
/// Suit, rank and count value are derived from the identifier on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("card id {0} is outside 0..52")]
pub struct InvalidCardId(pub u8);

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self(suit as u8 * 13 + rank.value() - 1)
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        if (id as usize) < DECK_SIZE {
            Some(Self(id))
        } else {
            None
        }
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn suit(self) -> Suit {
        match self.0 / 13 {
            0 => Suit::Hearts,
            1 => Suit::Diamonds,
            2 => Suit::Clubs,
            _ => Suit::Spades,
        }
    }

    pub fn rank(self) -> Rank {
        Rank::ORDERED[(self.0 % 13) as usize]
    }

    pub const fn face_value(self) -> u8 {
        self.0 % 13 + 1
    }

    pub const fn count_value(self) -> u8 {
        let face = self.face_value();
        if face > 10 { 10 } else { face }
    }

    pub const fn is_jack(self) -> bool {
        self.face_value() == Rank::Jack.value()
    }

    /// All 52 cards in identifier order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE as u8).map(Card)
    }
}

impl TryFrom<u8> for Card {
    type Error = InvalidCardId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Card::from_id(id).ok_or(InvalidCardId(id))
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}
