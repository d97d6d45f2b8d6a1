//! Exhaustive discard lookahead.
//!
//! A six-card deal has fifteen ways to throw two cards to the crib. For each
//! option the evaluator scores the kept four cards alone, against every
//! possible turn card, and (for crib-aware objectives) the thrown pair
//! against every pair of unseen cards.

pub mod evaluator;
pub mod matrix;
pub mod options;
pub mod stats;

pub use evaluator::{
    CRIB_COLUMNS, DiscardAnalysis, DiscardEvaluator, DiscardObjective, OptionSummary,
    RankedOption, crib_column,
};
pub use matrix::ScoreMatrix;
pub use options::{DISCARD_OPTIONS, DiscardOption, enumerate_discards, validate_deal};
pub use stats::ScoreStats;
