use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use corelib::RawRecord;
use serde_json::Value;

use crate::error::SnapshotError;

/// Reads one snapshot file into raw records.
///
/// `Ok(None)` means the file does not exist, which callers treat as
/// "no data" rather than a failure.
pub trait SnapshotReader: Send + Sync {
    fn read_records(&self, path: &Path) -> Result<Option<Vec<RawRecord>>, SnapshotError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsSnapshotReader;

impl SnapshotReader for FsSnapshotReader {
    fn read_records(&self, path: &Path) -> Result<Option<Vec<RawRecord>>, SnapshotError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        parse_records(path, &bytes).map(Some)
    }
}

/// A snapshot is a JSON array; non-object entries become empty records.
pub fn parse_records(path: &Path, bytes: &[u8]) -> Result<Vec<RawRecord>, SnapshotError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| SnapshotError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(items) => Ok(items.into_iter().map(RawRecord::from_value).collect()),
        _ => Err(SnapshotError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}
