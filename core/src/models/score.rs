use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PoolMetrics;

/// Six-way 0–100 decomposition of a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionBreakdown {
    pub depth: f64,
    pub activity: f64,
    pub impact: f64,
    pub stability: f64,
    pub trust: f64,
    pub fee: f64,
}

impl DimensionBreakdown {
    /// Clamp every dimension into 0..=100.
    pub fn clamped(self) -> Self {
        let c = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
        Self {
            depth: c(self.depth),
            activity: c(self.activity),
            impact: c(self.impact),
            stability: c(self.stability),
            trust: c(self.trust),
            fee: c(self.fee),
        }
    }
}

/// A normalized pool plus the scorer's verdict, as served to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPool {
    pub pool_id: String,
    pub score: f64,
    pub dimension_breakdown: DimensionBreakdown,
    pub tier_count: u8,
    pub warnings: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub metrics: PoolMetrics,
}

impl ScoredPool {
    pub fn token_name(&self) -> Option<&str> {
        self.metrics.token_name.as_deref()
    }

    pub fn token_code(&self) -> Option<&str> {
        self.metrics.token_code.as_deref()
    }

    pub fn token_issuer(&self) -> Option<&str> {
        self.metrics.token_issuer.as_deref()
    }
}
