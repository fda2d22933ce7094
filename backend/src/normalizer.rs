//! Raw producer record → `PoolMetrics`.
//!
//! The only place that knows the producer's field names. Total: every field
//! has a fallback, so a record can never fail normalization. Aliases are
//! listed in priority order; the first present and coercible value wins.

use corelib::{PoolMetrics, RawRecord, ValuationConfidence};

/// Trading fees arrive as integer basis points.
pub const FEE_BPS_DENOMINATOR: f64 = 10_000.0;

const TVL: &[&str] = &["totalValueLocked", "tvlXrp"];
const LIQUIDITY: &[&str] = &["liquidity", "liquidityUsd"];
const RESERVE: &[&str] = &["reserveA"];
const VOLUME_24H: &[&str] = &[
    "tokenVolume24hXrp",
    "tokenVolume24h",
    "volume24hXrp",
    "volume24h",
    "volume24hUsd",
];
const VOLUME_7D: &[&str] = &[
    "tokenVolume7dXrp",
    "tokenVolume7d",
    "volume7dXrp",
    "volume7d",
    "volume7dUsd",
];
const TX_24H: &[&str] = &["tx24h", "tokenExchanges24h", "tokenTakers24h"];
const TX_7D: &[&str] = &["tx7d", "tokenExchanges7d"];
const TRUSTLINES: &[&str] = &["trustlines", "tokenTrustlines"];
const BLACKHOLED: &[&str] = &["blackholed", "tokenBlackholed"];
const BLACKLISTED: &[&str] = &["blacklisted", "tokenBlacklisted"];
const FREEZE: &[&str] = &["freezeEnabled", "globalFreeze"];

pub fn normalize(raw: &RawRecord) -> PoolMetrics {
    let mint_a = first_string(raw, &["mintA", "assetA"]).unwrap_or_default();
    let mint_b = first_string(raw, &["mintB", "assetB"]).unwrap_or_default();

    let pool_id = first_string(raw, &["poolId", "id"])
        .unwrap_or_else(|| format!("{mint_a}_{mint_b}"));

    let total_value_locked = first_number(raw, TVL);

    let liquidity = total_value_locked
        .filter(|tvl| *tvl > 0.0)
        .or_else(|| first_number(raw, LIQUIDITY))
        .or_else(|| first_number(raw, RESERVE))
        .unwrap_or(0.0);

    let fee_fraction = raw
        .number("tradingFee")
        .map(|bps| bps / FEE_BPS_DENOMINATOR)
        .or_else(|| raw.number("feePct"));

    let valuation_confidence_level = ["valuationConfidenceLevel", "tvlLevel"]
        .iter()
        .find_map(|k| raw.string(k).as_deref().and_then(ValuationConfidence::parse))
        .unwrap_or_default();

    PoolMetrics {
        pool_id,
        mint_a,
        mint_b,
        // Older producers stored the AMM account under `issuer`.
        amm_account: first_string(raw, &["ammAccount", "issuer"]),

        token_name: raw.string("tokenName"),
        token_code: raw.string("tokenCode"),
        token_issuer: raw.string("tokenIssuer"),

        liquidity,
        volume_24h: first_number(raw, VOLUME_24H).unwrap_or(0.0),
        volume_7d: first_number(raw, VOLUME_7D),
        tx_count_24h: first_count(raw, TX_24H).unwrap_or(0),
        tx_count_7d: first_count(raw, TX_7D),
        fee_fraction,
        volatility: first_number(raw, &["volatilityPct", "volatility"]),

        trustline_count: first_count(raw, TRUSTLINES).unwrap_or(0),
        is_blacklisted: any_flag(raw, BLACKLISTED),
        is_blackholed: any_flag(raw, BLACKHOLED),
        freeze_enabled: any_flag(raw, FREEZE),

        total_value_locked,
        valuation_confidence_level,
        price_confident: first_flag(raw, &["priceConfident", "priceConfidence"]).unwrap_or(false),

        price_impact: first_number(raw, &["priceImpactPct", "priceImpact"]),
        data_age_hours: raw.number("dataAgeHours").unwrap_or(0.0),
        source_updated_at: ["tokenUpdatedAt", "updatedAt"]
            .iter()
            .find_map(|k| raw.timestamp(k)),
    }
}

fn first_number(raw: &RawRecord, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| raw.number(k))
}

fn first_count(raw: &RawRecord, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| raw.count(k))
}

fn first_string(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| raw.string(k))
}

fn first_flag(raw: &RawRecord, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| raw.flag(k))
}

/// Logical OR across aliases of the same signal.
fn any_flag(raw: &RawRecord, keys: &[&str]) -> bool {
    keys.iter().any(|k| raw.flag(k).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn norm(v: Value) -> PoolMetrics {
        normalize(&RawRecord::from_value(v))
    }

    #[test]
    fn empty_record_gets_documented_defaults() {
        let m = norm(json!({}));
        assert_eq!(m.pool_id, "_");
        assert_eq!(m.mint_a, "");
        assert_eq!(m.mint_b, "");
        assert_eq!(m.amm_account, None);
        assert_eq!(m.liquidity, 0.0);
        assert_eq!(m.volume_24h, 0.0);
        assert_eq!(m.volume_7d, None);
        assert_eq!(m.tx_count_24h, 0);
        assert_eq!(m.tx_count_7d, None);
        assert_eq!(m.fee_fraction, None);
        assert_eq!(m.volatility, None);
        assert_eq!(m.trustline_count, 0);
        assert!(!m.is_blacklisted && !m.is_blackholed && !m.freeze_enabled);
        assert_eq!(m.total_value_locked, None);
        assert_eq!(m.valuation_confidence_level, ValuationConfidence::Unknown);
        assert!(!m.price_confident);
        assert_eq!(m.data_age_hours, 0.0);
        assert_eq!(m.source_updated_at, None);
    }

    #[test]
    fn pool_id_prefers_explicit_identifier() {
        assert_eq!(norm(json!({ "poolId": "P1", "id": "P2" })).pool_id, "P1");
        assert_eq!(norm(json!({ "id": "P2", "mintA": "A" })).pool_id, "P2");
        assert_eq!(
            norm(json!({ "mintA": "XRP", "mintB": "FOO.rISSUER" })).pool_id,
            "XRP_FOO.rISSUER"
        );
    }

    #[test]
    fn liquidity_prefers_positive_tvl_then_explicit_then_reserve() {
        let m = norm(json!({ "tvlXrp": 500.0, "liquidity": 100, "reserveA": 10 }));
        assert_eq!(m.liquidity, 500.0);
        assert_eq!(m.total_value_locked, Some(500.0));

        let m = norm(json!({ "tvlXrp": 0, "liquidity": "100", "reserveA": 10 }));
        assert_eq!(m.liquidity, 100.0);
        assert_eq!(m.total_value_locked, Some(0.0));

        let m = norm(json!({ "reserveA": "42.5" }));
        assert_eq!(m.liquidity, 42.5);

        let m = norm(json!({ "liquidity": "lots" }));
        assert_eq!(m.liquidity, 0.0);
    }

    #[test]
    fn volume_prefers_token_level_fields() {
        let m = norm(json!({
            "tokenVolume24hXrp": 7,
            "volume24hXrp": 3,
            "volume7dXrp": 21
        }));
        assert_eq!(m.volume_24h, 7.0);
        assert_eq!(m.volume_7d, Some(21.0));

        let m = norm(json!({ "tokenVolume24h": "9", "volume24h": 1 }));
        assert_eq!(m.volume_24h, 9.0);
    }

    #[test]
    fn fee_basis_points_become_fraction() {
        assert_eq!(norm(json!({ "tradingFee": 30 })).fee_fraction, Some(0.003));
        assert_eq!(norm(json!({ "tradingFee": "864" })).fee_fraction, Some(0.0864));
        assert_eq!(norm(json!({ "feePct": 0.01 })).fee_fraction, Some(0.01));
        assert_eq!(norm(json!({ "tradingFee": "n/a" })).fee_fraction, None);
    }

    #[test]
    fn activity_coalesces_legacy_counters() {
        let m = norm(json!({ "tokenExchanges24h": 12, "tokenTakers24h": 4, "tokenExchanges7d": 80 }));
        assert_eq!(m.tx_count_24h, 12);
        assert_eq!(m.tx_count_7d, Some(80));

        let m = norm(json!({ "tx24h": 0, "tokenExchanges24h": 12 }));
        assert_eq!(m.tx_count_24h, 0);
    }

    #[test]
    fn risk_flags_or_across_aliases() {
        let m = norm(json!({ "blackholed": false, "tokenBlackholed": true }));
        assert!(m.is_blackholed);

        let m = norm(json!({ "blackholed": "true" }));
        assert!(m.is_blackholed);

        let m = norm(json!({ "globalFreeze": 1, "tokenBlacklisted": true }));
        assert!(m.freeze_enabled);
        assert!(m.is_blacklisted);
    }

    #[test]
    fn amm_account_is_kept_apart_from_token_issuer() {
        let m = norm(json!({
            "issuer": "rAMMaccount",
            "tokenIssuer": "rTokenIssuer"
        }));
        assert_eq!(m.amm_account.as_deref(), Some("rAMMaccount"));
        assert_eq!(m.token_issuer.as_deref(), Some("rTokenIssuer"));
    }

    #[test]
    fn valuation_fields_accept_both_generations() {
        let m = norm(json!({ "tvlLevel": "Partial", "priceConfidence": true }));
        assert_eq!(m.valuation_confidence_level, ValuationConfidence::Partial);
        assert!(m.price_confident);

        let m = norm(json!({ "valuationConfidenceLevel": "bogus", "tvlLevel": "realistic" }));
        assert_eq!(m.valuation_confidence_level, ValuationConfidence::Realistic);
    }

    #[test]
    fn trustlines_fall_back_to_token_level() {
        assert_eq!(norm(json!({ "tokenTrustlines": "4195" })).trustline_count, 4195);
        assert_eq!(norm(json!({ "trustlines": -2 })).trustline_count, 0);
    }
}
