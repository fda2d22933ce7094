//! Bundled sample dataset served when no real snapshot exists and the
//! fallback is enabled. Flows through the same normalizer and scorer.

use std::path::Path;

use corelib::RawRecord;
use tracing::error;

use crate::snapshot::reader::parse_records;

const SAMPLE_POOLS: &str = include_str!("../data/sample_pools.json");

pub fn sample_records() -> Vec<RawRecord> {
    match parse_records(Path::new("<bundled sample>"), SAMPLE_POOLS.as_bytes()) {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "bundled sample dataset is unreadable");
            Vec::new()
        }
    }
}
