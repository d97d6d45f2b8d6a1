use super::card_list;
use cribbage_core::discard::{DiscardEvaluator, DiscardObjective, RankedOption};
use cribbage_core::model::card::Card;
use cribbage_core::scoring::{HandScorer, ScoreError};
use tracing::{Level, event};

/// Picks the two cards to throw to the crib for a given objective.
pub struct DiscardPlanner;

impl DiscardPlanner {
    pub fn choose(
        scorer: &mut HandScorer,
        deal: &[Card],
        objective: DiscardObjective,
        owns_crib: bool,
    ) -> Result<RankedOption, ScoreError> {
        let mut evaluator = DiscardEvaluator::new(scorer);
        let analysis = evaluator.analyze(deal, objective.needs_crib())?;
        let ranked = analysis.ranked(objective, owns_crib);
        let best = ranked
            .first()
            .copied()
            .ok_or(ScoreError::InvalidDealSize { len: deal.len() })?;
        log_discard(deal, objective, owns_crib, &ranked);
        Ok(best)
    }
}

fn log_discard(
    deal: &[Card],
    objective: DiscardObjective,
    owns_crib: bool,
    ranked: &[RankedOption],
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let Some(best) = ranked.first() else {
        return;
    };

    let margin = ranked
        .get(1)
        .map(|runner_up| best.value - runner_up.value)
        .unwrap_or(0.0);
    let summary = &best.summary;

    event!(
        target: "cribbage_bot::discard",
        Level::INFO,
        objective = objective.label(),
        owns_crib,
        deal = %card_list(deal),
        kept = %card_list(&summary.option.kept),
        discarded = %card_list(&summary.option.discarded),
        value = best.value,
        margin,
        four_card = summary.four_card,
        turn_min = summary.turn.min,
        turn_max = summary.turn.max,
        turn_mean = summary.turn.mean,
        turn_std = summary.turn.std_dev,
        crib_mean = summary.crib.map(|crib| crib.mean),
    );
}
