use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use corelib::{RawRecord, ScoredPool, Scorer};

use super::matching::matches_tokens;
use crate::error::AppError;
use crate::normalizer::normalize;
use crate::scoring::evaluate;

/// Order-independent pair key: both sides uppercased, sorted, joined by `_`.
pub fn pair_key(a: &str, b: &str) -> String {
    let mut sides = [a.trim().to_uppercase(), b.trim().to_uppercase()];
    sides.sort();
    sides.join("_")
}

/// One published generation of the pool cache. Immutable once built;
/// readers hold it through an `Arc` while the writer swaps in the next one.
#[derive(Debug, Default)]
pub struct PoolView {
    pub generation: u64,
    /// `None` until the first successful refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
    by_pair: HashMap<String, Arc<ScoredPool>>,
    /// Score-descending.
    list: Vec<Arc<ScoredPool>>,
}

impl PoolView {
    /// Normalize → score → assemble every record into a fresh view.
    /// Any scoring failure abandons the whole build.
    pub fn build(
        records: &[RawRecord],
        scorer: &dyn Scorer,
        now: DateTime<Utc>,
        generation: u64,
    ) -> Result<Self, AppError> {
        let mut by_pair = HashMap::with_capacity(records.len());
        let mut list = Vec::with_capacity(records.len());

        for raw in records {
            let metrics = normalize(raw);
            let eval = evaluate(scorer, &metrics)?;

            let pool = Arc::new(ScoredPool {
                pool_id: metrics.pool_id.clone(),
                score: eval.output.score,
                dimension_breakdown: eval.output.dimension_breakdown,
                tier_count: eval.output.tier_count,
                warnings: eval.warnings,
                updated_at: metrics.source_updated_at.unwrap_or(now),
                metrics,
            });

            // Last write wins on a duplicated pair.
            by_pair.insert(pair_key(&pool.metrics.mint_a, &pool.metrics.mint_b), Arc::clone(&pool));
            list.push(pool);
        }

        // Stable: equal scores keep file order.
        list.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(Self {
            generation,
            refreshed_at: Some(now),
            by_pair,
            list,
        })
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn list(&self) -> &[Arc<ScoredPool>] {
        &self.list
    }

    pub fn get_exact(&self, a: &str, b: &str) -> Option<Arc<ScoredPool>> {
        self.by_pair.get(&pair_key(a, b)).cloned()
    }

    /// First pool in score order whose identifiers or token metadata
    /// contain both query tokens.
    pub fn get_fuzzy(&self, a: &str, b: &str) -> Option<Arc<ScoredPool>> {
        self.list
            .iter()
            .find(|p| matches_tokens(&p.metrics, a, b))
            .cloned()
    }

    pub fn get_by_id(&self, pool_id: &str) -> Option<Arc<ScoredPool>> {
        self.list.iter().find(|p| p.pool_id == pool_id).cloned()
    }
}
