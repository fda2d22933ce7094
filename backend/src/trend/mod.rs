pub mod indexer;
pub mod series;

pub use indexer::{TrendIndex, TrendIndexer, TrendIndexerConfig};
pub use series::{TrendMetric, series};
