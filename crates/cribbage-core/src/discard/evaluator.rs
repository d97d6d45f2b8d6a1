use crate::discard::matrix::ScoreMatrix;
use crate::discard::options::{DISCARD_OPTIONS, DiscardOption, enumerate_discards, validate_deal};
use crate::discard::stats::ScoreStats;
use crate::model::card::{Card, DECK_SIZE};
use crate::scoring::{HandScorer, ScoreError};
use serde::{Deserialize, Serialize};

/// Columns of the crib matrix: one per ordered card pair, `a * 52 + b`.
pub const CRIB_COLUMNS: usize = DECK_SIZE * DECK_SIZE;

pub fn crib_column(a: Card, b: Card) -> usize {
    a.index() * DECK_SIZE + b.index()
}

/// What a discard choice maximises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardObjective {
    /// Score of the four kept cards before the cut.
    BestFourCard,
    /// Lowest five-card score over every possible turn card.
    BestWorstCase,
    /// Mean five-card score over every possible turn card.
    BestExpected,
    /// Expected hand plus expected crib when dealing, minus it otherwise.
    HandAndCrib,
}

impl DiscardObjective {
    pub const ALL: [DiscardObjective; 4] = [
        DiscardObjective::BestFourCard,
        DiscardObjective::BestWorstCase,
        DiscardObjective::BestExpected,
        DiscardObjective::HandAndCrib,
    ];

    pub const fn needs_crib(self) -> bool {
        matches!(self, DiscardObjective::HandAndCrib)
    }

    pub const fn label(self) -> &'static str {
        match self {
            DiscardObjective::BestFourCard => "best_four_card",
            DiscardObjective::BestWorstCase => "best_worst_case",
            DiscardObjective::BestExpected => "best_expected",
            DiscardObjective::HandAndCrib => "hand_and_crib",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionSummary {
    pub option: DiscardOption,
    pub four_card: u8,
    pub turn: ScoreStats,
    /// Only filled when the crib matrix was computed.
    pub crib: Option<ScoreStats>,
}

impl OptionSummary {
    pub fn value(&self, objective: DiscardObjective, owns_crib: bool) -> f64 {
        match objective {
            DiscardObjective::BestFourCard => f64::from(self.four_card),
            DiscardObjective::BestWorstCase => f64::from(self.turn.min),
            DiscardObjective::BestExpected => self.turn.mean,
            DiscardObjective::HandAndCrib => {
                let crib = self.crib.map(|stats| stats.mean).unwrap_or(0.0);
                if owns_crib {
                    self.turn.mean + crib
                } else {
                    self.turn.mean - crib
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedOption {
    pub summary: OptionSummary,
    pub value: f64,
}

/// Per-option summaries for one deal, in canonical option order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardAnalysis {
    summaries: Vec<OptionSummary>,
}

impl DiscardAnalysis {
    pub fn summaries(&self) -> &[OptionSummary] {
        &self.summaries
    }

    /// Options from best to worst. The sort is stable, so equal values keep
    /// canonical order.
    pub fn ranked(&self, objective: DiscardObjective, owns_crib: bool) -> Vec<RankedOption> {
        let mut ranked: Vec<RankedOption> = self
            .summaries
            .iter()
            .map(|summary| RankedOption {
                summary: *summary,
                value: summary.value(objective, owns_crib),
            })
            .collect();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        ranked
    }

    pub fn best(&self, objective: DiscardObjective, owns_crib: bool) -> Option<RankedOption> {
        self.ranked(objective, owns_crib).into_iter().next()
    }
}

/// Exhaustive discard lookahead on top of a borrowed [`HandScorer`].
pub struct DiscardEvaluator<'a> {
    scorer: &'a mut HandScorer,
}

impl<'a> DiscardEvaluator<'a> {
    pub fn new(scorer: &'a mut HandScorer) -> Self {
        Self { scorer }
    }

    /// Score of the kept four cards for each option, without a turn card.
    pub fn four_card_scores(&mut self, deal: &[Card]) -> Result<Vec<u8>, ScoreError> {
        let deal = validate_deal(deal)?;
        enumerate_discards(&deal)
            .iter()
            .map(|option| self.scorer.score(&option.kept, None))
            .collect()
    }

    /// Five-card score of every option against every turn card outside the deal.
    pub fn turn_matrix(&mut self, deal: &[Card]) -> Result<ScoreMatrix, ScoreError> {
        let deal = validate_deal(deal)?;
        let mut matrix = ScoreMatrix::new(DISCARD_OPTIONS, DECK_SIZE);
        for (row, option) in enumerate_discards(&deal).iter().enumerate() {
            for turn in Card::all().filter(|card| !deal.contains(card)) {
                let score = self.scorer.score(&option.kept, Some(turn))?;
                matrix.set(row, turn.index(), score);
            }
        }
        Ok(matrix)
    }

    /// Crib score of every option's discards joined by each pair of cards
    /// outside the deal, stored at `crib_column(a, b)` with `a < b`.
    pub fn crib_matrix(&mut self, deal: &[Card]) -> Result<ScoreMatrix, ScoreError> {
        let deal = validate_deal(deal)?;
        let remaining: Vec<Card> = Card::all().filter(|card| !deal.contains(card)).collect();
        let mut matrix = ScoreMatrix::new(DISCARD_OPTIONS, CRIB_COLUMNS);
        for (row, option) in enumerate_discards(&deal).iter().enumerate() {
            let [first, second] = option.discarded;
            for (idx, &a) in remaining.iter().enumerate() {
                for &b in &remaining[idx + 1..] {
                    let score = self.scorer.score(&[first, second, a, b], None)?;
                    matrix.set(row, crib_column(a, b), score);
                }
            }
        }
        Ok(matrix)
    }

    /// Builds the per-option summaries. The crib matrix is only computed when
    /// `include_crib` is set.
    pub fn analyze(
        &mut self,
        deal: &[Card],
        include_crib: bool,
    ) -> Result<DiscardAnalysis, ScoreError> {
        let cards = validate_deal(deal)?;
        let four_card = self.four_card_scores(deal)?;
        let turns = self.turn_matrix(deal)?;
        let cribs = if include_crib {
            Some(self.crib_matrix(deal)?)
        } else {
            None
        };

        let summaries = enumerate_discards(&cards)
            .into_iter()
            .zip(four_card)
            .enumerate()
            .map(|(row, (option, four_card))| OptionSummary {
                option,
                four_card,
                turn: turns.row_stats(row).unwrap_or_default(),
                crib: cribs.as_ref().and_then(|matrix| matrix.row_stats(row)),
            })
            .collect();
        Ok(DiscardAnalysis { summaries })
    }

    /// The best option for `objective`, ties going to the earliest option.
    pub fn choose(
        &mut self,
        deal: &[Card],
        objective: DiscardObjective,
        owns_crib: bool,
    ) -> Result<RankedOption, ScoreError> {
        self.analyze(deal, objective.needs_crib())?
            .best(objective, owns_crib)
            .ok_or(ScoreError::InvalidDealSize { len: deal.len() })
    }
}
