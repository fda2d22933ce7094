pub mod files;
pub mod reader;

pub use files::{SnapshotFile, list_snapshot_files, parse_name_timestamp, signature};
pub use reader::{FsSnapshotReader, SnapshotReader};
