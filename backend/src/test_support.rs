use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use corelib::RawRecord;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::SnapshotError;
use crate::snapshot::SnapshotReader;

#[path = "../tests/support/scorers.rs"]
mod scorers;

pub use scorers::{BrokenScorer, MockScorer};

/// In-memory reader; paths not registered read as missing.
#[derive(Default)]
pub struct MemoryReader {
    files: Mutex<HashMap<PathBuf, Result<Vec<Value>, String>>>,
    pub reads: AtomicUsize,
}

impl MemoryReader {
    pub fn put(&self, path: impl Into<PathBuf>, records: Vec<Value>) {
        self.files.lock().insert(path.into(), Ok(records));
    }

    pub fn put_broken(&self, path: impl Into<PathBuf>) {
        self.files
            .lock()
            .insert(path.into(), Err("corrupt".to_string()));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SnapshotReader for MemoryReader {
    fn read_records(&self, path: &Path) -> Result<Option<Vec<RawRecord>>, SnapshotError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.files.lock().get(path) {
            None => Ok(None),
            Some(Ok(values)) => Ok(Some(
                values.iter().cloned().map(RawRecord::from_value).collect(),
            )),
            Some(Err(_)) => Err(SnapshotError::NotAnArray {
                path: path.to_path_buf(),
            }),
        }
    }
}
