//! Discovery of timestamped snapshot files.
//!
//! Naming convention: `<prefix>_<YYYYMMDD>_<HHMMSS>Z.json`. Files carrying the
//! prefix without a parsable stamp still participate, ordered by their
//! modification time instead.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

/// A snapshot file found on disk. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub name: String,
    pub path: PathBuf,
    pub modified_at_ms: i64,
    /// From the file name when it matches the convention, else `modified_at_ms`.
    pub derived_timestamp: DateTime<Utc>,
}

impl SnapshotFile {
    pub fn from_parts(name: impl Into<String>, path: PathBuf, modified_at_ms: i64) -> Self {
        let name = name.into();
        let derived_timestamp = parse_name_timestamp(&name)
            .or_else(|| DateTime::from_timestamp_millis(modified_at_ms))
            .unwrap_or_default();
        Self {
            name,
            path,
            modified_at_ms,
            derived_timestamp,
        }
    }
}

/// Enumerates `<prefix>_*.json` in `dir`, ascending by derived timestamp
/// with ties broken by name. A missing or unreadable directory is empty.
pub fn list_snapshot_files(dir: &Path, prefix: &str) -> Vec<SnapshotFile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "snapshot directory unavailable");
            return Vec::new();
        }
    };

    let mut files: Vec<SnapshotFile> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().into_string().ok()?;
            if !is_snapshot_name(&name, prefix) {
                return None;
            }

            // Follows symlinks, so a linked snapshot counts as a file.
            let meta = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => meta,
                Ok(_) => return None,
                Err(e) => {
                    warn!(file = %name, error = %e, "skipping snapshot without metadata");
                    return None;
                }
            };

            let modified_at_ms = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as i64)
                .unwrap_or(0);

            Some(SnapshotFile::from_parts(name, entry.path(), modified_at_ms))
        })
        .collect();

    sort_files(&mut files);
    files
}

/// Ascending by derived timestamp, ties by name.
pub fn sort_files(files: &mut [SnapshotFile]) {
    files.sort_by(|a, b| {
        a.derived_timestamp
            .cmp(&b.derived_timestamp)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Fingerprint of a discovered file set: `name:mtime` joined by `|`.
pub fn signature(files: &[SnapshotFile]) -> String {
    files
        .iter()
        .map(|f| format!("{}:{}", f.name, f.modified_at_ms))
        .collect::<Vec<_>>()
        .join("|")
}

fn is_snapshot_name(name: &str, prefix: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let head = format!("{}_", prefix.to_ascii_lowercase());
    lower.starts_with(&head) && lower.ends_with(".json")
}

/// Parses the `_YYYYMMDD_HHMMSSZ` stamp that precedes the extension.
pub fn parse_name_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    };

    let mut parts = stem.rsplit('_');
    let time = parts.next()?;
    let date = parts.next()?;
    // The stamp must follow a prefix.
    parts.next()?;

    let time = time.strip_suffix('Z').or_else(|| time.strip_suffix('z'))?;
    if date.len() != 8 || time.len() != 6 {
        return None;
    }
    if !date.bytes().chain(time.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}
