#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use corelib::{DimensionBreakdown, PoolMetrics, RawRecord, ScoreOutput, Scorer};
use lpscope::SnapshotError;
use lpscope::snapshot::{FsSnapshotReader, SnapshotReader};

mod scorers;

pub use scorers::{BrokenScorer, MockScorer};

/// `MockScorer` that takes `delay` per pool, to widen refresh windows.
pub struct SlowScorer {
    pub delay: Duration,
}

impl Scorer for SlowScorer {
    fn score(&self, m: &PoolMetrics) -> anyhow::Result<ScoreOutput> {
        std::thread::sleep(self.delay);
        MockScorer.score(m)
    }

    fn warnings(&self, m: &PoolMetrics, b: &DimensionBreakdown) -> anyhow::Result<Vec<String>> {
        MockScorer.warnings(m, b)
    }
}

/// Filesystem reader that counts file reads.
#[derive(Default)]
pub struct CountingReader {
    reads: AtomicUsize,
}

impl CountingReader {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SnapshotReader for CountingReader {
    fn read_records(&self, path: &Path) -> Result<Option<Vec<RawRecord>>, SnapshotError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        FsSnapshotReader.read_records(path)
    }
}

pub fn write_json(dir: &Path, name: &str, body: serde_json::Value) {
    std::fs::write(dir.join(name), body.to_string()).expect("write snapshot");
}
