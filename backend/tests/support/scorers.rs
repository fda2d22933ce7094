//! Scorer doubles shared by unit and integration tests. Depends on `corelib`
//! only so both the library and `tests/` can compile it.

use corelib::{DimensionBreakdown, PoolMetrics, ScoreOutput, Scorer};

/// Deterministic scorer: score tracks liquidity, warnings track risk flags.
pub struct MockScorer;

impl Scorer for MockScorer {
    fn score(&self, m: &PoolMetrics) -> anyhow::Result<ScoreOutput> {
        let score = (m.liquidity / 10.0).min(100.0);
        Ok(ScoreOutput {
            score,
            dimension_breakdown: DimensionBreakdown {
                depth: score,
                activity: (m.tx_count_24h as f64).min(100.0),
                impact: 50.0,
                stability: 50.0,
                trust: if m.is_blackholed { 100.0 } else { 20.0 },
                fee: m.fee_fraction.map(|f| 100.0 - f * 1_000.0).unwrap_or(0.0),
            },
            tier_count: 1 + (score / 20.0) as u8,
        })
    }

    fn warnings(&self, m: &PoolMetrics, b: &DimensionBreakdown) -> anyhow::Result<Vec<String>> {
        let mut out = Vec::new();
        if b.depth < 1.0 {
            out.push("thin liquidity".to_string());
        }
        if m.freeze_enabled {
            out.push("issuer can freeze".to_string());
        }
        Ok(out)
    }
}

/// Scorer that always fails.
pub struct BrokenScorer;

impl Scorer for BrokenScorer {
    fn score(&self, _m: &PoolMetrics) -> anyhow::Result<ScoreOutput> {
        anyhow::bail!("scorer offline")
    }

    fn warnings(&self, _m: &PoolMetrics, _b: &DimensionBreakdown) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("scorer offline")
    }
}
