use super::{PlayContext, Policy, PolicyError};
use cribbage_core::discard::{DiscardOption, enumerate_discards, validate_deal};
use cribbage_core::model::card::Card;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Throws a random pair to the crib and pegs the first legal card.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_discard(
        &mut self,
        deal: &[Card],
        _owns_crib: bool,
    ) -> Result<DiscardOption, PolicyError> {
        let deal = validate_deal(deal)?;
        let options = enumerate_discards(&deal);
        let pick = self.rng.gen_range(0..options.len());
        Ok(options[pick])
    }

    fn choose_play(&mut self, ctx: &PlayContext<'_>) -> Option<Card> {
        ctx.legal_plays().first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::RandomPolicy;
    use crate::policy::{Policy, PolicyError};
    use cribbage_core::model::card::Card;
    use cribbage_core::scoring::ScoreError;

    fn deal() -> Vec<Card> {
        [3u8, 18, 33, 48, 11, 25]
            .iter()
            .map(|&id| Card::from_id(id).unwrap())
            .collect()
    }

    #[test]
    fn same_seed_discards_the_same_cards() {
        let mut a = RandomPolicy::new(8);
        let mut b = RandomPolicy::new(8);
        for _ in 0..10 {
            assert_eq!(
                a.choose_discard(&deal(), true).unwrap(),
                b.choose_discard(&deal(), true).unwrap()
            );
        }
    }

    #[test]
    fn discards_come_from_the_deal() {
        let mut policy = RandomPolicy::new(1);
        let cards = deal();
        let option = policy.choose_discard(&cards, false).unwrap();
        assert!(option.discarded.iter().all(|card| cards.contains(card)));
        assert!(option.kept.iter().all(|card| !option.discarded.contains(card)));
    }

    #[test]
    fn invalid_deal_is_an_error() {
        let mut policy = RandomPolicy::new(1);
        assert_eq!(
            policy.choose_discard(&deal()[..3], true),
            Err(PolicyError::Score(ScoreError::InvalidDealSize { len: 3 }))
        );
    }
}
