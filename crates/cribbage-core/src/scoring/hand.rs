use crate::model::card::Card;
use crate::scoring::cache::{CacheStats, HandCache, ScoreCache};
use crate::scoring::{HAND_SIZE, ScoreError, ensure_unique, rules};
use serde::{Deserialize, Serialize};

/// Count values run 1..=10.
const FIFTEENS_RADIX: usize = 11;
/// Face values run 1..=13.
const FACE_RADIX: usize = 14;
const SUIT_RADIX: usize = 4;

/// Which memo tables a [`HandScorer`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub cache_fifteens: bool,
    pub cache_pairs: bool,
    pub cache_runs: bool,
    pub cache_flush: bool,
    /// Memoise whole-hand totals as well. Off by default.
    pub cache_full: bool,
}

impl ScorerConfig {
    pub const fn uncached() -> Self {
        Self {
            cache_fifteens: false,
            cache_pairs: false,
            cache_runs: false,
            cache_flush: false,
            cache_full: false,
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            cache_fifteens: true,
            cache_pairs: true,
            cache_runs: true,
            cache_flush: true,
            cache_full: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub fifteens: u8,
    pub pairs: u8,
    pub runs: u8,
    pub flush: u8,
    pub nobs: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.fifteens + self.pairs + self.runs + self.flush + self.nobs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScorerCacheStats {
    pub full: CacheStats,
    pub fifteens: CacheStats,
    pub pairs: CacheStats,
    pub runs: CacheStats,
    pub flush: CacheStats,
}

/// Scores four-card hands with an optional turn card.
///
/// A missing turn card is how cribs and discard candidates are valued before
/// the cut. Each enabled cache is private to this scorer, so one scorer per
/// thread is the expected usage.
#[derive(Debug, Clone)]
pub struct HandScorer {
    config: ScorerConfig,
    full: Option<HandCache>,
    fifteens: Option<ScoreCache>,
    pairs: Option<ScoreCache>,
    runs: Option<ScoreCache>,
    flush: Option<ScoreCache>,
}

impl HandScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self {
            config,
            full: config.cache_full.then(HandCache::new),
            fifteens: config
                .cache_fifteens
                .then(|| ScoreCache::new(FIFTEENS_RADIX)),
            pairs: config.cache_pairs.then(|| ScoreCache::new(FACE_RADIX)),
            runs: config.cache_runs.then(|| ScoreCache::new(FACE_RADIX)),
            flush: config.cache_flush.then(|| ScoreCache::new(SUIT_RADIX)),
        }
    }

    pub fn config(&self) -> ScorerConfig {
        self.config
    }

    pub fn score(&mut self, hand: &[Card], turn: Option<Card>) -> Result<u8, ScoreError> {
        let hand = validate(hand, turn)?;
        if let Some(score) = self.full.as_mut().and_then(|cache| cache.get(&hand, turn)) {
            return Ok(score);
        }
        let score = self.breakdown_of(&hand, turn)?.total();
        if let Some(cache) = self.full.as_mut() {
            cache.insert(&hand, turn, score);
        }
        Ok(score)
    }

    pub fn breakdown(
        &mut self,
        hand: &[Card],
        turn: Option<Card>,
    ) -> Result<ScoreBreakdown, ScoreError> {
        let hand = validate(hand, turn)?;
        self.breakdown_of(&hand, turn)
    }

    pub fn fifteens(&mut self, hand: &[Card], turn: Option<Card>) -> Result<u8, ScoreError> {
        let hand = validate(hand, turn)?;
        self.fifteens_of(&hand, turn)
    }

    pub fn pairs(&mut self, hand: &[Card], turn: Option<Card>) -> Result<u8, ScoreError> {
        let hand = validate(hand, turn)?;
        self.pairs_of(&hand, turn)
    }

    pub fn runs(&mut self, hand: &[Card], turn: Option<Card>) -> Result<u8, ScoreError> {
        let hand = validate(hand, turn)?;
        self.runs_of(&hand, turn)
    }

    pub fn flush(&mut self, hand: &[Card], turn: Option<Card>) -> Result<u8, ScoreError> {
        let hand = validate(hand, turn)?;
        self.flush_of(&hand, turn)
    }

    pub fn nobs(&mut self, hand: &[Card], turn: Option<Card>) -> Result<u8, ScoreError> {
        let hand = validate(hand, turn)?;
        Ok(rules::nobs(&hand, turn))
    }

    pub fn cache_stats(&self) -> ScorerCacheStats {
        let stats = |cache: &Option<ScoreCache>| cache.as_ref().map(ScoreCache::stats).unwrap_or_default();
        ScorerCacheStats {
            full: self.full.as_ref().map(HandCache::stats).unwrap_or_default(),
            fifteens: stats(&self.fifteens),
            pairs: stats(&self.pairs),
            runs: stats(&self.runs),
            flush: stats(&self.flush),
        }
    }

    fn breakdown_of(
        &mut self,
        hand: &[Card; HAND_SIZE],
        turn: Option<Card>,
    ) -> Result<ScoreBreakdown, ScoreError> {
        Ok(ScoreBreakdown {
            fifteens: self.fifteens_of(hand, turn)?,
            pairs: self.pairs_of(hand, turn)?,
            runs: self.runs_of(hand, turn)?,
            flush: self.flush_of(hand, turn)?,
            nobs: rules::nobs(hand, turn),
        })
    }

    fn fifteens_of(&mut self, hand: &[Card; HAND_SIZE], turn: Option<Card>) -> Result<u8, ScoreError> {
        let cards = CardSet::new(hand, turn);
        let key = cards.sorted_key(Card::count_value);
        memo(self.fifteens.as_mut(), key.as_slice(), || {
            rules::fifteens(cards.as_slice())
        })
    }

    fn pairs_of(&mut self, hand: &[Card; HAND_SIZE], turn: Option<Card>) -> Result<u8, ScoreError> {
        let cards = CardSet::new(hand, turn);
        let key = cards.sorted_key(Card::face_value);
        memo(self.pairs.as_mut(), key.as_slice(), || {
            rules::pairs(cards.as_slice())
        })
    }

    fn runs_of(&mut self, hand: &[Card; HAND_SIZE], turn: Option<Card>) -> Result<u8, ScoreError> {
        let cards = CardSet::new(hand, turn);
        let key = cards.sorted_key(Card::face_value);
        memo(self.runs.as_mut(), key.as_slice(), || {
            rules::runs(cards.as_slice())
        })
    }

    fn flush_of(&mut self, hand: &[Card; HAND_SIZE], turn: Option<Card>) -> Result<u8, ScoreError> {
        // Hand suits sorted, turn suit kept last so it stays distinguishable.
        let mut key = Key::default();
        for card in hand {
            key.push(card.suit().index() as u8);
        }
        key.values[..HAND_SIZE].sort_unstable();
        if let Some(turn) = turn {
            key.push(turn.suit().index() as u8);
        }
        memo(self.flush.as_mut(), key.as_slice(), || rules::flush(hand, turn))
    }
}

impl Default for HandScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

fn validate(hand: &[Card], turn: Option<Card>) -> Result<[Card; HAND_SIZE], ScoreError> {
    let len = hand.len() + usize::from(turn.is_some());
    let hand: [Card; HAND_SIZE] = hand
        .try_into()
        .map_err(|_| ScoreError::InvalidHandSize { len })?;
    ensure_unique(hand.iter().copied().chain(turn))?;
    Ok(hand)
}

fn memo<F>(cache: Option<&mut ScoreCache>, key: &[u8], compute: F) -> Result<u8, ScoreError>
where
    F: FnOnce() -> u8,
{
    match cache {
        Some(cache) => cache.get_or_insert_with(key, compute),
        None => Ok(compute()),
    }
}

/// Hand plus optional turn card without allocating.
struct CardSet {
    cards: [Card; HAND_SIZE + 1],
    len: usize,
}

impl CardSet {
    fn new(hand: &[Card; HAND_SIZE], turn: Option<Card>) -> Self {
        let mut cards = [hand[0]; HAND_SIZE + 1];
        cards[..HAND_SIZE].copy_from_slice(hand);
        let len = match turn {
            Some(turn) => {
                cards[HAND_SIZE] = turn;
                HAND_SIZE + 1
            }
            None => HAND_SIZE,
        };
        Self { cards, len }
    }

    fn as_slice(&self) -> &[Card] {
        &self.cards[..self.len]
    }

    fn sorted_key(&self, attribute: fn(Card) -> u8) -> Key {
        let mut key = Key::default();
        for &card in self.as_slice() {
            key.push(attribute(card));
        }
        key.values[..key.len].sort_unstable();
        key
    }
}

#[derive(Default)]
struct Key {
    values: [u8; HAND_SIZE + 1],
    len: usize,
}

impl Key {
    fn push(&mut self, value: u8) {
        self.values[self.len] = value;
        self.len += 1;
    }

    fn as_slice(&self) -> &[u8] {
        &self.values[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::{HandScorer, ScoreBreakdown, ScorerConfig};
    use crate::model::card::Card;
    use crate::scoring::ScoreError;

    fn cards(ids: &[u8]) -> Vec<Card> {
        ids.iter().map(|&id| Card::from_id(id).unwrap()).collect()
    }

    fn turn(id: u8) -> Option<Card> {
        Card::from_id(id)
    }

    fn configs() -> [ScorerConfig; 3] {
        let full = ScorerConfig {
            cache_full: true,
            ..ScorerConfig::default()
        };
        [ScorerConfig::default(), ScorerConfig::uncached(), full]
    }

    #[test]
    fn known_hands_score_as_expected() {
        let cases: [(&[u8], Option<u8>, u8); 10] = [
            (&[0, 1, 2, 3], Some(4), 12),
            (&[0, 1, 2, 3], None, 8),
            (&[9, 10, 11, 12], Some(0), 10),
            (&[8, 10, 50, 12], Some(36), 8),
            (&[8, 9, 10, 11], Some(12), 11),
            (&[4, 5, 6, 7], Some(12), 13),
            (&[0, 1, 2, 3], Some(12), 13),
            (&[2, 9, 18, 3], Some(23), 0),
            (&[1, 10, 5, 4], Some(23), 10),
            (&[12, 24, 9, 0], Some(23), 4),
        ];

        for config in configs() {
            let mut scorer = HandScorer::new(config);
            for (hand, turn_id, expected) in cases {
                let turn = turn_id.and_then(Card::from_id);
                // Twice, so cached paths are exercised too.
                for _ in 0..2 {
                    assert_eq!(
                        scorer.score(&cards(hand), turn).unwrap(),
                        expected,
                        "hand {hand:?} turn {turn_id:?} config {config:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn twenty_nine_is_the_maximum_hand() {
        let mut scorer = HandScorer::default();
        // 5H 5D 5C JS with the 5S turned.
        let breakdown = scorer.breakdown(&cards(&[4, 17, 30, 49]), turn(43)).unwrap();
        assert_eq!(
            breakdown,
            ScoreBreakdown {
                fifteens: 16,
                pairs: 12,
                runs: 0,
                flush: 0,
                nobs: 1,
            }
        );
        assert_eq!(breakdown.total(), 29);
    }

    #[test]
    fn sub_scorers_match_breakdown() {
        let mut scorer = HandScorer::default();
        let hand = cards(&[9, 10, 11, 12]);
        assert_eq!(scorer.runs(&hand, turn(0)).unwrap(), 4);
        assert_eq!(scorer.flush(&hand, turn(0)).unwrap(), 5);
        assert_eq!(scorer.nobs(&hand, turn(0)).unwrap(), 1);
        assert_eq!(scorer.pairs(&hand, turn(0)).unwrap(), 0);
        assert_eq!(scorer.fifteens(&cards(&[0, 4, 9, 10]), turn(11)).unwrap(), 6);
    }

    #[test]
    fn hand_order_does_not_change_score() {
        // 2H JH 6H 5H: fifteens, a flush, and nobs against a heart turn.
        let ids = [1u8, 10, 5, 4];
        for config in configs() {
            let mut scorer = HandScorer::new(config);
            for starter in [turn(23), turn(7), None] {
                let expected = scorer.breakdown(&cards(&ids), starter).unwrap();
                let mut orders = 0;
                for a in 0..4 {
                    for b in (0..4).filter(|&b| b != a) {
                        for c in (0..4).filter(|&c| c != a && c != b) {
                            let d = 6 - a - b - c;
                            let hand = cards(&[ids[a], ids[b], ids[c], ids[d]]);
                            assert_eq!(
                                scorer.breakdown(&hand, starter).unwrap(),
                                expected,
                                "order {:?} turn {:?}",
                                hand,
                                starter
                            );
                            orders += 1;
                        }
                    }
                }
                assert_eq!(orders, 24);
            }
        }
    }

    #[test]
    fn turn_suit_is_not_sorted_into_flush_key() {
        let mut scorer = HandScorer::default();
        // Hearts hand with a spade turn, then a spade-heavy hand with a heart turn.
        assert_eq!(scorer.flush(&cards(&[0, 1, 2, 3]), turn(51)).unwrap(), 4);
        assert_eq!(scorer.flush(&cards(&[1, 2, 3, 51]), turn(0)).unwrap(), 0);
    }

    #[test]
    fn caches_record_hits() {
        let mut scorer = HandScorer::default();
        let hand = cards(&[0, 1, 2, 3]);
        scorer.score(&hand, turn(4)).unwrap();
        scorer.score(&hand, turn(4)).unwrap();
        let stats = scorer.cache_stats();
        assert_eq!(stats.fifteens.hits, 1);
        assert_eq!(stats.fifteens.misses, 1);
        assert_eq!(stats.full.lookups(), 0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let mut scorer = HandScorer::default();
        assert_eq!(
            scorer.score(&cards(&[0, 1, 2]), turn(4)),
            Err(ScoreError::InvalidHandSize { len: 4 })
        );
        assert_eq!(
            scorer.score(&cards(&[0, 1, 2, 3, 4]), turn(5)),
            Err(ScoreError::InvalidHandSize { len: 6 })
        );
        assert_eq!(
            scorer.score(&cards(&[0, 1, 2, 3]), turn(3)),
            Err(ScoreError::DuplicateCard(Card::from_id(3).unwrap()))
        );
    }
}
