use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much of a pool's valuation could be priced.
///
/// - `Realistic` → base asset and the issued token were both priced
/// - `Partial`   → only the base-asset side was priced
/// - `Unknown`   → no reliable valuation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationConfidence {
    Realistic,
    Partial,
    #[default]
    Unknown,
}

impl ValuationConfidence {
    /// Case-insensitive parse; anything unrecognised is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "realistic" => Some(Self::Realistic),
            "partial" => Some(Self::Partial),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Normalized pool observation.
///
/// Built only by the normalizer; immutable afterwards. `pool_id` is the
/// stable key used to group observations of the same pool across snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetrics {
    // Identity
    pub pool_id: String,
    pub mint_a: String,
    pub mint_b: String,
    /// AMM ledger account. Never the token issuer.
    pub amm_account: Option<String>,

    // Token metadata
    pub token_name: Option<String>,
    pub token_code: Option<String>,
    pub token_issuer: Option<String>,

    // Economics (base-asset units)
    pub liquidity: f64,
    pub volume_24h: f64,
    pub volume_7d: Option<f64>,
    pub tx_count_24h: u64,
    pub tx_count_7d: Option<u64>,
    /// 0..=1, e.g. 0.003 for a 30 bps pool.
    pub fee_fraction: Option<f64>,
    pub volatility: Option<f64>,

    // Trust
    pub trustline_count: u64,
    pub is_blacklisted: bool,
    pub is_blackholed: bool,
    pub freeze_enabled: bool,

    // Derived truth
    pub total_value_locked: Option<f64>,
    pub valuation_confidence_level: ValuationConfidence,
    pub price_confident: bool,

    // Optional analytics
    pub price_impact: Option<f64>,
    pub data_age_hours: f64,
    pub source_updated_at: Option<DateTime<Utc>>,
}

impl PoolMetrics {
    /// Liquidity as charted: TVL when the producer supplied one.
    pub fn effective_liquidity(&self) -> f64 {
        self.total_value_locked.unwrap_or(self.liquidity)
    }
}
