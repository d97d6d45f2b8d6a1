use crate::model::card::Card;

/// Cards a player keeps for the hand, in the order they were dealt.
///
/// The played mask tracks which cards have already been pegged; the cards
/// themselves stay in the hand so they can be counted afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    played: Vec<bool>,
}

impl Hand {
    pub fn with_cards(cards: Vec<Card>) -> Self {
        let played = vec![false; cards.len()];
        Self { cards, played }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn position(&self, card: Card) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn played_mask(&self) -> &[bool] {
        &self.played
    }

    pub fn is_played(&self, card: Card) -> bool {
        self.position(card)
            .map(|idx| self.played[idx])
            .unwrap_or(false)
    }

    /// Marks `card` as pegged. Returns false if it is not held or already played.
    pub fn mark_played(&mut self, card: Card) -> bool {
        match self.position(card) {
            Some(idx) if !self.played[idx] => {
                self.played[idx] = true;
                true
            }
            _ => false,
        }
    }

    /// Unplayed cards with their index in the hand.
    pub fn unplayed(&self) -> impl Iterator<Item = (usize, Card)> + '_ {
        self.cards
            .iter()
            .copied()
            .enumerate()
            .filter(|(idx, _)| !self.played[*idx])
    }

    pub fn unplayed_count(&self) -> usize {
        self.played.iter().filter(|played| !**played).count()
    }
}
