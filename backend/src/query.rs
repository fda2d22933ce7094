//! Read surface consumed by outer layers (CLI, HTTP adapters).
//!
//! Every call returns data or an empty/absent result; "not found" is never
//! an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use corelib::{ScoredPool, Scorer, TrendPoint};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::pool_cache::{PoolCache, PoolCacheConfig};
use crate::snapshot::SnapshotReader;
use crate::time::Clock;
use crate::trend::{TrendIndexer, TrendIndexerConfig};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerSummary {
    pub issuer: String,
    pub pool_count: usize,
    pub average_score: f64,
    pub total_liquidity: f64,
    pub total_volume_24h: f64,
    pub total_volume_7d: f64,
    pub pools: Vec<Arc<ScoredPool>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub pool_id: String,
    pub score: f64,
    pub tier_count: u8,
    pub warnings: Vec<String>,
    pub token_name: Option<String>,
    pub token_code: Option<String>,
    pub token_issuer: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alerts {
    pub count: usize,
    pub alerts: Vec<Alert>,
}

/// Pool cache and trend indexer wired to one scorer.
pub struct LpScope {
    pools: Arc<PoolCache>,
    trends: TrendIndexer,
}

pub struct LpScopeBuilder {
    config: AppConfig,
    scorer: Option<Arc<dyn Scorer>>,
    reader: Option<Arc<dyn SnapshotReader>>,
    clock: Option<Arc<dyn Clock>>,
}

impl LpScopeBuilder {
    pub fn scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn reader(mut self, reader: Arc<dyn SnapshotReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Fails with `ScorerUnavailable` when no scorer was supplied.
    pub fn build(self) -> Result<LpScope, AppError> {
        let scorer = self.scorer.ok_or_else(|| {
            AppError::ScorerUnavailable("no scoring collaborator was configured".to_string())
        })?;

        let mut pools = PoolCache::new(PoolCacheConfig::from(&self.config), Arc::clone(&scorer));
        let mut trends = TrendIndexer::new(TrendIndexerConfig::from(&self.config), scorer);

        if let Some(reader) = self.reader {
            pools = pools.with_reader(Arc::clone(&reader));
            trends = trends.with_reader(reader);
        }
        if let Some(clock) = self.clock {
            pools = pools.with_clock(clock);
        }

        info!(
            pools_path = %self.config.pools_path.display(),
            snapshot_dir = %self.config.snapshot_dir.display(),
            refresh_secs = self.config.refresh_interval.as_secs(),
            fallback_sample = self.config.fallback_sample,
            "lpscope initialized"
        );

        Ok(LpScope {
            pools: Arc::new(pools),
            trends,
        })
    }
}

impl LpScope {
    pub fn builder(config: AppConfig) -> LpScopeBuilder {
        LpScopeBuilder {
            config,
            scorer: None,
            reader: None,
            clock: None,
        }
    }

    pub fn pool_cache(&self) -> &Arc<PoolCache> {
        &self.pools
    }

    pub fn trend_indexer(&self) -> &TrendIndexer {
        &self.trends
    }

    pub fn get_by_pair(&self, asset_a: &str, asset_b: &str) -> Option<Arc<ScoredPool>> {
        self.pools.ensure_fresh();
        let found = self.pools.get_by_pair(asset_a, asset_b);
        if found.is_none() {
            debug!(asset_a, asset_b, "no pool for pair");
        }
        found
    }

    pub fn list_all(&self) -> Vec<Arc<ScoredPool>> {
        self.pools.ensure_fresh();
        self.pools.list()
    }

    pub fn get_pool(&self, pool_id: &str) -> Option<Arc<ScoredPool>> {
        self.pools.ensure_fresh();
        self.pools.get_by_id(pool_id)
    }

    pub fn get_trend(&self, pool_id: &str) -> Vec<TrendPoint> {
        if pool_id.trim().is_empty() {
            return Vec::new();
        }
        self.trends.get_trend(pool_id)
    }

    /// Aggregate over pools whose token issuer matches (case-insensitive).
    pub fn issuer_summary(&self, issuer: &str) -> Option<IssuerSummary> {
        let wanted = issuer.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        let pools: Vec<_> = self
            .list_all()
            .into_iter()
            .filter(|p| p.token_issuer().is_some_and(|i| i.to_lowercase() == wanted))
            .collect();

        if pools.is_empty() {
            return None;
        }

        let pool_count = pools.len();
        let total_score: f64 = pools.iter().map(|p| p.score).sum();

        Some(IssuerSummary {
            issuer: wanted,
            pool_count,
            average_score: total_score / pool_count as f64,
            total_liquidity: pools.iter().map(|p| p.metrics.liquidity).sum(),
            total_volume_24h: pools.iter().map(|p| p.metrics.volume_24h).sum(),
            total_volume_7d: pools.iter().filter_map(|p| p.metrics.volume_7d).sum(),
            pools,
        })
    }

    /// Every pool carrying at least one warning, in score order.
    pub fn alerts(&self) -> Alerts {
        let alerts: Vec<Alert> = self
            .list_all()
            .iter()
            .filter(|p| !p.warnings.is_empty())
            .map(|p| Alert {
                pool_id: p.pool_id.clone(),
                score: p.score,
                tier_count: p.tier_count,
                warnings: p.warnings.clone(),
                token_name: p.metrics.token_name.clone(),
                token_code: p.metrics.token_code.clone(),
                token_issuer: p.metrics.token_issuer.clone(),
                updated_at: p.updated_at,
            })
            .collect();

        Alerts {
            count: alerts.len(),
            alerts,
        }
    }
}
