use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DimensionBreakdown, PoolMetrics};

/// One scored observation of a pool, tagged with its snapshot's timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub tier_count: u8,
    pub dimension_breakdown: DimensionBreakdown,
    pub warnings: Vec<String>,
    pub metrics: PoolMetrics,
}
