use crate::model::card::Card;
use crate::scoring::ScoreError;
use serde::Serialize;
use std::collections::HashMap;

const UNSET: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Four,
    Five,
}

/// Dense memo table for one counting rule.
///
/// Keys are sorted attribute values (count value, face value or suit index),
/// each below `radix`. Four- and five-element keys live in separate tables of
/// `radix^4` and `radix^5` slots.
#[derive(Debug, Clone)]
pub struct ScoreCache {
    radix: usize,
    four: Vec<u8>,
    five: Vec<u8>,
    stats: CacheStats,
}

impl ScoreCache {
    pub fn new(radix: usize) -> Self {
        Self {
            radix,
            four: vec![UNSET; radix.pow(4)],
            five: vec![UNSET; radix.pow(5)],
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn get(&mut self, key: &[u8]) -> Result<Option<u8>, ScoreError> {
        let (table, slot) = self.locate(key)?;
        let value = self.table(table)[slot];
        if value == UNSET {
            self.stats.misses += 1;
            Ok(None)
        } else {
            self.stats.hits += 1;
            Ok(Some(value))
        }
    }

    pub fn insert(&mut self, key: &[u8], score: u8) -> Result<(), ScoreError> {
        let (table, slot) = self.locate(key)?;
        self.table_mut(table)[slot] = score;
        Ok(())
    }

    /// Returns the stored score for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: &[u8], compute: F) -> Result<u8, ScoreError>
    where
        F: FnOnce() -> u8,
    {
        if let Some(score) = self.get(key)? {
            return Ok(score);
        }
        let score = compute();
        self.insert(key, score)?;
        Ok(score)
    }

    fn locate(&self, key: &[u8]) -> Result<(Table, usize), ScoreError> {
        let table = match key.len() {
            4 => Table::Four,
            5 => Table::Five,
            len => return Err(ScoreError::InvalidHandSize { len }),
        };
        let mut slot = 0usize;
        for &digit in key {
            let digit = usize::from(digit);
            if digit >= self.radix {
                return Err(ScoreError::CacheKeyOutOfBounds {
                    key: key.to_vec(),
                    radix: self.radix,
                });
            }
            slot = slot * self.radix + digit;
        }
        Ok((table, slot))
    }

    fn table(&self, table: Table) -> &[u8] {
        match table {
            Table::Four => &self.four,
            Table::Five => &self.five,
        }
    }

    fn table_mut(&mut self, table: Table) -> &mut [u8] {
        match table {
            Table::Four => &mut self.four,
            Table::Five => &mut self.five,
        }
    }
}

/// Whole-hand memo keyed by the sorted hand plus the turn card.
#[derive(Debug, Clone, Default)]
pub struct HandCache {
    entries: HashMap<([Card; 4], Option<Card>), u8>,
    stats: CacheStats,
}

impl HandCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, hand: &[Card; 4], turn: Option<Card>) -> Option<u8> {
        let found = self.entries.get(&Self::key(hand, turn)).copied();
        match found {
            Some(_) => self.stats.hits += 1,
            None => self.stats.misses += 1,
        }
        found
    }

    pub fn insert(&mut self, hand: &[Card; 4], turn: Option<Card>, score: u8) {
        self.entries.insert(Self::key(hand, turn), score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn key(hand: &[Card; 4], turn: Option<Card>) -> ([Card; 4], Option<Card>) {
        let mut sorted = *hand;
        sorted.sort_unstable();
        (sorted, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::{HandCache, ScoreCache};
    use crate::model::card::Card;
    use crate::scoring::ScoreError;

    #[test]
    fn miss_then_hit() {
        let mut cache = ScoreCache::new(11);
        assert_eq!(cache.get(&[1, 2, 3, 4]).unwrap(), None);
        cache.insert(&[1, 2, 3, 4], 6).unwrap();
        assert_eq!(cache.get(&[1, 2, 3, 4]).unwrap(), Some(6));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn zero_scores_are_cached() {
        let mut cache = ScoreCache::new(14);
        cache.insert(&[1, 3, 5, 7, 9], 0).unwrap();
        assert_eq!(cache.get(&[1, 3, 5, 7, 9]).unwrap(), Some(0));
    }

    #[test]
    fn four_and_five_card_keys_do_not_collide() {
        let mut cache = ScoreCache::new(14);
        cache.insert(&[0, 1, 2, 3], 4).unwrap();
        assert_eq!(cache.get(&[0, 0, 1, 2, 3]).unwrap(), None);
    }

    #[test]
    fn digits_at_or_above_radix_are_rejected() {
        let mut cache = ScoreCache::new(11);
        let err = cache.get(&[1, 2, 3, 11]).unwrap_err();
        assert_eq!(
            err,
            ScoreError::CacheKeyOutOfBounds {
                key: vec![1, 2, 3, 11],
                radix: 11
            }
        );
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let mut cache = ScoreCache::new(4);
        assert_eq!(
            cache.insert(&[0, 1, 2], 3),
            Err(ScoreError::InvalidHandSize { len: 3 })
        );
    }

    #[test]
    fn get_or_insert_with_computes_once() {
        let mut cache = ScoreCache::new(4);
        let mut calls = 0;
        for _ in 0..3 {
            let score = cache
                .get_or_insert_with(&[0, 0, 0, 0], || {
                    calls += 1;
                    4
                })
                .unwrap();
            assert_eq!(score, 4);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn hand_cache_ignores_hand_order() {
        let hand: [Card; 4] = [3u8, 1, 2, 0].map(|id| Card::from_id(id).unwrap());
        let reordered: [Card; 4] = [0u8, 1, 2, 3].map(|id| Card::from_id(id).unwrap());
        let turn = Card::from_id(4);
        let mut cache = HandCache::new();
        cache.insert(&hand, turn, 12);
        assert_eq!(cache.get(&reordered, turn), Some(12));
        assert_eq!(cache.get(&reordered, None), None);
        assert_eq!(cache.len(), 1);
    }
}
