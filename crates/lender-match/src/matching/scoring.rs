use super::domain::Policy;
use super::evaluation::EvaluationOutcome;

pub const ELIGIBLE_SCORE: f64 = 100.0;
pub const INELIGIBLE_SCORE: f64 = 0.0;

/// Turns an evaluation into a ranking score. Higher scores rank first.
pub trait MatchScorer: Send + Sync {
    fn score(&self, policy: &Policy, outcome: &EvaluationOutcome) -> f64;
}

/// Pass/fail scoring: every eligible policy ranks equally above every ineligible one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryScorer;

impl MatchScorer for BinaryScorer {
    fn score(&self, _policy: &Policy, outcome: &EvaluationOutcome) -> f64 {
        if outcome.eligible {
            ELIGIBLE_SCORE
        } else {
            INELIGIBLE_SCORE
        }
    }
}
