use std::fmt;
use std::str::FromStr;

use corelib::TrendPoint;
use serde::{Deserialize, Serialize};

/// A chartable quantity extracted from each trend point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendMetric {
    Score,
    TierCount,
    Depth,
    Activity,
    Impact,
    Stability,
    Trust,
    Fee,
    /// TVL when present, else normalized liquidity.
    Liquidity,
    Volume24h,
    FeeFraction,
    TrustlineCount,
    WarningCount,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 13] = [
        Self::Score,
        Self::TierCount,
        Self::Depth,
        Self::Activity,
        Self::Impact,
        Self::Stability,
        Self::Trust,
        Self::Fee,
        Self::Liquidity,
        Self::Volume24h,
        Self::FeeFraction,
        Self::TrustlineCount,
        Self::WarningCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::TierCount => "tierCount",
            Self::Depth => "depth",
            Self::Activity => "activity",
            Self::Impact => "impact",
            Self::Stability => "stability",
            Self::Trust => "trust",
            Self::Fee => "fee",
            Self::Liquidity => "liquidity",
            Self::Volume24h => "volume24h",
            Self::FeeFraction => "feeFraction",
            Self::TrustlineCount => "trustlineCount",
            Self::WarningCount => "warningCount",
        }
    }

    pub fn value(&self, p: &TrendPoint) -> Option<f64> {
        let d = &p.dimension_breakdown;
        let m = &p.metrics;
        match self {
            Self::Score => Some(p.score),
            Self::TierCount => Some(f64::from(p.tier_count)),
            Self::Depth => Some(d.depth),
            Self::Activity => Some(d.activity),
            Self::Impact => Some(d.impact),
            Self::Stability => Some(d.stability),
            Self::Trust => Some(d.trust),
            Self::Fee => Some(d.fee),
            Self::Liquidity => Some(m.effective_liquidity()),
            Self::Volume24h => Some(m.volume_24h),
            Self::FeeFraction => m.fee_fraction,
            Self::TrustlineCount => Some(m.trustline_count as f64),
            Self::WarningCount => Some(p.warnings.len() as f64),
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown trend metric: {s}"))
    }
}

/// One value per point, in series order; `None` where the point lacks it.
pub fn series(points: &[TrendPoint], metric: TrendMetric) -> Vec<Option<f64>> {
    points.iter().map(|p| metric.value(p)).collect()
}
