use serde::{Deserialize, Serialize};

use crate::models::{DimensionBreakdown, PoolMetrics};

/// Verdict returned by the scoring collaborator for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutput {
    /// 0..=100
    pub score: f64,
    pub dimension_breakdown: DimensionBreakdown,
    /// 1..=6
    pub tier_count: u8,
}

impl ScoreOutput {
    /// Pull every field into its documented range.
    pub fn clamped(self) -> Self {
        let score = if self.score.is_finite() {
            self.score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            score,
            dimension_breakdown: self.dimension_breakdown.clamped(),
            tier_count: self.tier_count.clamp(1, 6),
        }
    }
}

/// External scoring collaborator.
///
/// The core owns no scoring heuristics; an implementation must be supplied
/// at construction. Calls may fail (the collaborator can live out of process),
/// in which case the whole pass that needed the score is abandoned.
pub trait Scorer: Send + Sync {
    fn score(&self, metrics: &PoolMetrics) -> anyhow::Result<ScoreOutput>;

    fn warnings(
        &self,
        metrics: &PoolMetrics,
        breakdown: &DimensionBreakdown,
    ) -> anyhow::Result<Vec<String>>;
}
