use corelib::{PoolMetrics, ScoreOutput, Scorer};

use crate::error::AppError;

/// Scorer verdict plus the warnings derived from its breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub output: ScoreOutput,
    pub warnings: Vec<String>,
}

/// Runs both collaborator calls for one pool.
pub fn evaluate(scorer: &dyn Scorer, metrics: &PoolMetrics) -> Result<Evaluation, AppError> {
    let failed = |e: anyhow::Error| AppError::Scoring {
        pool_id: metrics.pool_id.clone(),
        reason: format!("{e:#}"),
    };

    let output = scorer.score(metrics).map_err(failed)?.clamped();
    let warnings = scorer
        .warnings(metrics, &output.dimension_breakdown)
        .map_err(failed)?;

    Ok(Evaluation { output, warnings })
}
