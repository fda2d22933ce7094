//! Per-pool history reconstructed from a directory of snapshot files.
//!
//! The index is memoized against a signature of the discovered file set
//! (name + mtime per file); while the signature is unchanged, builds return
//! the published index without reading any file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::logger::{TraceId, root_span, warn_if_slow};
use corelib::{Scorer, TrendPoint};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::normalizer::normalize;
use crate::scoring::evaluate;
use crate::snapshot::{FsSnapshotReader, SnapshotFile, SnapshotReader, list_snapshot_files, signature};

#[derive(Clone, Debug)]
pub struct TrendIndexerConfig {
    pub snapshot_dir: PathBuf,
    pub snapshot_prefix: String,
}

impl From<&AppConfig> for TrendIndexerConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            snapshot_dir: cfg.snapshot_dir.clone(),
            snapshot_prefix: cfg.snapshot_prefix.clone(),
        }
    }
}

/// One build of the trend index. Immutable once published.
#[derive(Debug, Default)]
pub struct TrendIndex {
    pub signature: String,
    pub files_indexed: usize,
    pub files_skipped: usize,
    by_pool: HashMap<String, Vec<TrendPoint>>,
}

impl TrendIndex {
    /// Ascending by timestamp; empty for an unknown pool.
    pub fn trend(&self, pool_id: &str) -> &[TrendPoint] {
        self.by_pool.get(pool_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pool_count(&self) -> usize {
        self.by_pool.len()
    }
}

pub struct TrendIndexer {
    config: TrendIndexerConfig,
    scorer: Arc<dyn Scorer>,
    reader: Arc<dyn SnapshotReader>,

    published: RwLock<Option<Arc<TrendIndex>>>,
    build_lock: Mutex<()>,
}

impl TrendIndexer {
    pub fn new(config: TrendIndexerConfig, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            config,
            scorer,
            reader: Arc::new(FsSnapshotReader),
            published: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn SnapshotReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn list_snapshot_files(&self) -> Vec<SnapshotFile> {
        list_snapshot_files(&self.config.snapshot_dir, &self.config.snapshot_prefix)
    }

    /// Current index, rebuilt only if the file set changed since the last build.
    pub fn build_index(&self) -> Arc<TrendIndex> {
        let files = self.list_snapshot_files();
        let sig = signature(&files);

        if let Some(index) = self.cached(&sig) {
            return index;
        }

        let _guard = self.build_lock.lock();
        // The directory may have changed, or another builder published,
        // while we waited: list again under the lock.
        let files = self.list_snapshot_files();
        let sig = signature(&files);
        if let Some(index) = self.cached(&sig) {
            return index;
        }

        let trace_id = TraceId::default();
        let span = root_span("trend_index_build", &trace_id);
        let _enter = span.enter();

        let index = Arc::new(warn_if_slow("trend_index_build", Duration::from_secs(1), || {
            self.build_from(&files, sig)
        }));

        info!(
            files = index.files_indexed,
            skipped = index.files_skipped,
            pools = index.pool_count(),
            "trend index rebuilt"
        );

        *self.published.write() = Some(Arc::clone(&index));
        index
    }

    /// Series for one pool; empty for an unknown id.
    pub fn get_trend(&self, pool_id: &str) -> Vec<TrendPoint> {
        self.build_index().trend(pool_id).to_vec()
    }

    fn cached(&self, sig: &str) -> Option<Arc<TrendIndex>> {
        self.published
            .read()
            .as_ref()
            .filter(|idx| idx.signature == sig)
            .cloned()
    }

    fn build_from(&self, files: &[SnapshotFile], sig: String) -> TrendIndex {
        let mut by_pool: HashMap<String, Vec<TrendPoint>> = HashMap::new();
        let mut files_indexed = 0;
        let mut files_skipped = 0;

        for file in files {
            match self.points_for(file) {
                Ok(points) => {
                    debug!(file = %file.name, points = points.len(), "snapshot indexed");
                    files_indexed += 1;
                    for point in points {
                        by_pool
                            .entry(point.metrics.pool_id.clone())
                            .or_default()
                            .push(point);
                    }
                }
                Err(e) => {
                    warn!(file = %file.name, error = %e, "skipping unreadable snapshot");
                    files_skipped += 1;
                }
            }
        }

        // Stable: equal timestamps keep discovery (name) order.
        for series in by_pool.values_mut() {
            series.sort_by_key(|p| p.timestamp);
        }

        TrendIndex {
            signature: sig,
            files_indexed,
            files_skipped,
            by_pool,
        }
    }

    /// All points from one file, or an error if any part of it fails.
    fn points_for(&self, file: &SnapshotFile) -> Result<Vec<TrendPoint>, AppError> {
        // Vanished between listing and reading: nothing to index.
        let Some(records) = self.reader.read_records(&file.path)? else {
            return Ok(Vec::new());
        };

        records
            .iter()
            .map(|raw| {
                let metrics = normalize(raw);
                let eval = evaluate(self.scorer.as_ref(), &metrics)?;
                Ok(TrendPoint {
                    timestamp: file.derived_timestamp,
                    score: eval.output.score,
                    tier_count: eval.output.tier_count,
                    dimension_breakdown: eval.output.dimension_breakdown,
                    warnings: eval.warnings,
                    metrics,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BrokenScorer, MockScorer};
    use chrono::SecondsFormat;
    use std::fs;
    use tracing_test::traced_test;

    fn indexer(dir: &std::path::Path) -> TrendIndexer {
        TrendIndexer::new(
            TrendIndexerConfig {
                snapshot_dir: dir.to_path_buf(),
                snapshot_prefix: "pools".into(),
            },
            Arc::new(MockScorer),
        )
    }

    fn write(dir: &std::path::Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn unknown_pool_has_empty_trend() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pools_20250101_000000Z.json", r#"[{"mintA":"XRP","mintB":"FOO"}]"#);
        assert!(indexer(dir.path()).get_trend("XRP_BAR").is_empty());
    }

    #[test]
    fn missing_directory_is_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let idx = indexer(&dir.path().join("absent")).build_index();
        assert_eq!(idx.pool_count(), 0);
        assert_eq!(idx.signature, "");
    }

    #[test]
    fn points_carry_file_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "pools_20250101_000000Z.json",
            r#"[{"mintA":"XRP","mintB":"FOO.rISSUER","liquidity":"100"}]"#,
        );

        let trend = indexer(dir.path()).get_trend("XRP_FOO.rISSUER");
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].metrics.liquidity, 100.0);
        assert_eq!(
            trend[0].timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2025-01-01T00:00:00Z"
        );
    }

    #[traced_test]
    #[test]
    fn bad_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pools_20250101_000000Z.json", r#"[{"mintA":"XRP","mintB":"FOO","liquidity":1}]"#);
        write(dir.path(), "pools_20250102_000000Z.json", "{not json");
        write(dir.path(), "pools_20250103_000000Z.json", r#"{"pools":[]}"#);
        write(dir.path(), "pools_20250104_000000Z.json", r#"[{"mintA":"XRP","mintB":"FOO","liquidity":2}]"#);

        let idx = indexer(dir.path()).build_index();
        assert_eq!(idx.files_indexed, 2);
        assert_eq!(idx.files_skipped, 2);
        assert_eq!(idx.trend("XRP_FOO").len(), 2);
        assert!(logs_contain("skipping unreadable snapshot"));
    }

    #[test]
    fn scorer_failure_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pools_20250101_000000Z.json", r#"[{"mintA":"XRP","mintB":"FOO"}]"#);

        let idx = TrendIndexer::new(
            TrendIndexerConfig {
                snapshot_dir: dir.path().to_path_buf(),
                snapshot_prefix: "pools".into(),
            },
            Arc::new(BrokenScorer),
        )
        .build_index();

        assert_eq!(idx.files_skipped, 1);
        assert_eq!(idx.pool_count(), 0);
    }

    #[test]
    fn same_timestamp_keeps_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pools_b_20250101_000000Z.json", r#"[{"poolId":"P","liquidity":2}]"#);
        write(dir.path(), "pools_a_20250101_000000Z.json", r#"[{"poolId":"P","liquidity":1}]"#);

        let trend = indexer(dir.path()).get_trend("P");
        let liq: Vec<_> = trend.iter().map(|p| p.metrics.liquidity).collect();
        assert_eq!(liq, vec![1.0, 2.0]);
    }

    #[test]
    fn changed_file_set_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pools_20250101_000000Z.json", r#"[{"poolId":"P","liquidity":1}]"#);
        let ix = indexer(dir.path());

        let first = ix.build_index();
        assert_eq!(first.trend("P").len(), 1);

        write(dir.path(), "pools_20250102_000000Z.json", r#"[{"poolId":"P","liquidity":2}]"#);
        let second = ix.build_index();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.trend("P").len(), 2);
        // Readers holding the old index still see it intact.
        assert_eq!(first.trend("P").len(), 1);
    }

    #[test]
    fn waiting_builder_sees_files_added_while_blocked() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pools_20250101_000000Z.json", r#"[{"poolId":"P","liquidity":1}]"#);
        let ix = indexer(dir.path());

        let built = std::thread::scope(|s| {
            let guard = ix.build_lock.lock();
            let waiter = s.spawn(|| ix.build_index());

            // Let the waiter list the single file and block on the lock.
            std::thread::sleep(std::time::Duration::from_millis(100));
            write(dir.path(), "pools_20250102_000000Z.json", r#"[{"poolId":"P","liquidity":2}]"#);
            drop(guard);

            waiter.join().unwrap()
        });

        assert_eq!(built.files_indexed, 2);
        assert_eq!(built.trend("P").len(), 2);
        assert!(Arc::ptr_eq(&built, &ix.build_index()));
    }
}
