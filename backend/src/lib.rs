pub mod config;
pub mod error;
pub mod normalizer;
pub mod pool_cache;
pub mod query;
pub mod sample;
pub mod scoring;
pub mod snapshot;
pub mod time;
pub mod trend;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use error::{AppError, SnapshotError};
pub use pool_cache::{Freshness, PoolCache, PoolCacheConfig};
pub use query::{Alert, Alerts, IssuerSummary, LpScope, LpScopeBuilder};
pub use trend::{TrendIndex, TrendIndexer, TrendIndexerConfig, TrendMetric};
