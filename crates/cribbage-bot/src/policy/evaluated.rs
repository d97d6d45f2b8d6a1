use super::{PlayContext, Policy, PolicyError};
use crate::bot::{DiscardPlanner, PlayPlanner};
use cribbage_core::discard::{DiscardObjective, DiscardOption};
use cribbage_core::model::card::Card;
use cribbage_core::scoring::{HandScorer, ScorerCacheStats, ScorerConfig};
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// How an [`EvaluatedPolicy`] pegs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeggingStyle {
    /// First legal card in hand order.
    FirstLegal,
    /// Priority rules of [`PlayPlanner`].
    #[default]
    Rules,
}

/// Discards by exhaustive lookahead and pegs by [`PeggingStyle`].
///
/// Owns its scorer so memoised scores carry over between decisions.
pub struct EvaluatedPolicy {
    objective: DiscardObjective,
    pegging: PeggingStyle,
    scorer: HandScorer,
}

impl EvaluatedPolicy {
    pub fn new(objective: DiscardObjective, pegging: PeggingStyle, config: ScorerConfig) -> Self {
        Self {
            objective,
            pegging,
            scorer: HandScorer::new(config),
        }
    }

    pub fn objective(&self) -> DiscardObjective {
        self.objective
    }

    pub fn pegging(&self) -> PeggingStyle {
        self.pegging
    }

    pub fn cache_stats(&self) -> ScorerCacheStats {
        self.scorer.cache_stats()
    }
}

impl Policy for EvaluatedPolicy {
    fn choose_discard(
        &mut self,
        deal: &[Card],
        owns_crib: bool,
    ) -> Result<DiscardOption, PolicyError> {
        let best = DiscardPlanner::choose(&mut self.scorer, deal, self.objective, owns_crib)?;
        Ok(best.summary.option)
    }

    fn choose_play(&mut self, ctx: &PlayContext<'_>) -> Option<Card> {
        let chosen = match self.pegging {
            PeggingStyle::FirstLegal => ctx.legal_plays().first().copied(),
            PeggingStyle::Rules => PlayPlanner::choose(ctx.hand, ctx.pegging),
        };
        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "cribbage_bot::policy",
                Level::DEBUG,
                seat = ?ctx.seat,
                dealer = ?ctx.dealer,
                style = ?self.pegging,
                score = ctx.scores.score(ctx.seat),
                chosen = ?chosen,
            );
        }
        chosen
    }
}
