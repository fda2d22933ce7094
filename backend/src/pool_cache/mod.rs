//! Current scored view of all pools.
//!
//! Single writer (refresh), many readers. A refresh builds a complete new
//! `PoolView` off to the side and publishes it with one pointer swap, so a
//! reader sees either the old generation or the new one, never a mix.

pub mod matching;
pub mod poller;
pub mod view;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::logger::{TraceId, root_span, warn_if_slow};
use corelib::{RawRecord, ScoredPool, Scorer};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::sample::sample_records;
use crate::snapshot::{FsSnapshotReader, SnapshotReader};
use crate::time::{Clock, SystemClock};

pub use view::{PoolView, pair_key};

#[derive(Clone, Debug)]
pub struct PoolCacheConfig {
    pub pools_path: PathBuf,
    pub fallback_sample: bool,
    pub refresh_interval: Duration,
}

impl PoolCacheConfig {
    pub fn staleness_threshold(&self) -> Duration {
        self.refresh_interval.saturating_mul(2)
    }
}

impl From<&AppConfig> for PoolCacheConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            pools_path: cfg.pools_path.clone(),
            fallback_sample: cfg.fallback_sample,
            refresh_interval: cfg.refresh_interval,
        }
    }
}

/// Outcome of `ensure_fresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Within the staleness threshold; nothing done.
    Fresh,
    /// A synchronous refresh ran and published a new generation.
    Refreshed,
    /// A refresh was attempted and failed; the previous view is still served.
    RefreshFailed,
}

pub struct PoolCache {
    config: PoolCacheConfig,
    scorer: Arc<dyn Scorer>,
    reader: Arc<dyn SnapshotReader>,
    clock: Arc<dyn Clock>,

    /// Published view. Replaced wholesale, never mutated.
    current: RwLock<Arc<PoolView>>,
    /// Serializes writers so generations publish in order.
    refresh_lock: Mutex<()>,
    last_attempt: Mutex<Option<DateTime<Utc>>>,
    /// Background refresher, at most one.
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl PoolCache {
    pub fn new(config: PoolCacheConfig, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            config,
            scorer,
            reader: Arc::new(FsSnapshotReader),
            clock: Arc::new(SystemClock),
            current: RwLock::new(Arc::new(PoolView::default())),
            refresh_lock: Mutex::new(()),
            last_attempt: Mutex::new(None),
            poller: Mutex::new(None),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn SnapshotReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PoolCacheConfig {
        &self.config
    }

    /// The currently published view.
    pub fn view(&self) -> Arc<PoolView> {
        self.current.read().clone()
    }

    pub fn last_refresh_time(&self) -> Option<DateTime<Utc>> {
        self.view().refreshed_at
    }

    pub fn last_attempt_time(&self) -> Option<DateTime<Utc>> {
        *self.last_attempt.lock()
    }

    pub fn generation(&self) -> u64 {
        self.view().generation
    }

    fn is_stale(&self) -> bool {
        let Some(refreshed_at) = self.last_refresh_time() else {
            return true;
        };
        let age = self.clock.now() - refreshed_at;
        match age.to_std() {
            Ok(age) => age > self.config.staleness_threshold(),
            // Refreshed "in the future" (clock stepped back): treat as fresh.
            Err(_) => false,
        }
    }

    /// Refresh synchronously if the cache was never populated or is older
    /// than the staleness threshold. Failures are logged, not returned.
    pub fn ensure_fresh(&self) -> Freshness {
        if !self.is_stale() {
            return Freshness::Fresh;
        }

        let _guard = self.refresh_lock.lock();
        // Another caller may have refreshed while we waited.
        if !self.is_stale() {
            return Freshness::Fresh;
        }

        match self.refresh_locked() {
            Ok(_) => Freshness::Refreshed,
            Err(e) => {
                error!(error = %e, "pool cache refresh failed; serving previous view");
                Freshness::RefreshFailed
            }
        }
    }

    /// Rebuild from the canonical file and publish. Returns the pool count.
    ///
    /// On error the previous view stays published.
    pub fn refresh(&self) -> Result<usize, AppError> {
        let _guard = self.refresh_lock.lock();
        self.refresh_locked()
    }

    fn refresh_locked(&self) -> Result<usize, AppError> {
        let trace_id = TraceId::default();
        let span = root_span("pool_cache_refresh", &trace_id);
        let _enter = span.enter();

        let now = self.clock.now();
        *self.last_attempt.lock() = Some(now);

        let records = self.load_records()?;
        let generation = self.generation() + 1;

        let view = warn_if_slow("pool_cache_build", Duration::from_secs(1), || {
            PoolView::build(&records, self.scorer.as_ref(), now, generation)
        })?;

        let count = view.len();
        *self.current.write() = Arc::new(view);

        info!(
            pools = count,
            generation,
            path = %self.config.pools_path.display(),
            "pool cache refreshed"
        );
        Ok(count)
    }

    #[instrument(skip(self), fields(path = %self.config.pools_path.display()))]
    fn load_records(&self) -> Result<Vec<RawRecord>, AppError> {
        let records = self
            .reader
            .read_records(&self.config.pools_path)?
            .unwrap_or_default();

        if !records.is_empty() {
            debug!(records = records.len(), "loaded canonical pool list");
            return Ok(records);
        }

        if self.config.fallback_sample {
            warn!("no pool snapshot available; using bundled sample pools");
            return Ok(sample_records());
        }

        debug!("no pool snapshot available; publishing empty view");
        Ok(Vec::new())
    }

    // =========================
    // Reads (no I/O)
    // =========================

    pub fn get_exact(&self, asset_a: &str, asset_b: &str) -> Option<Arc<ScoredPool>> {
        self.view().get_exact(asset_a, asset_b)
    }

    pub fn get_fuzzy(&self, token_a: &str, token_b: &str) -> Option<Arc<ScoredPool>> {
        self.view().get_fuzzy(token_a, token_b)
    }

    /// Exact pair key first, then fuzzy token match, against one view.
    pub fn get_by_pair(&self, a: &str, b: &str) -> Option<Arc<ScoredPool>> {
        let view = self.view();
        view.get_exact(a, b).or_else(|| view.get_fuzzy(a, b))
    }

    pub fn get_by_id(&self, pool_id: &str) -> Option<Arc<ScoredPool>> {
        self.view().get_by_id(pool_id)
    }

    /// Every pool, score-descending.
    pub fn list(&self) -> Vec<Arc<ScoredPool>> {
        self.view().list().to_vec()
    }
}
