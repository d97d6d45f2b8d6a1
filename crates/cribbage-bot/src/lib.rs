pub mod bot;
pub mod policy;

pub use bot::{DiscardPlanner, PlayCandidate, PlayPlanner, PlayTier};
pub use policy::{EvaluatedPolicy, PeggingStyle, PlayContext, Policy, PolicyError, RandomPolicy};
