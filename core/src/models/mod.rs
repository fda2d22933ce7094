pub mod pool;
pub mod raw;
pub mod score;
pub mod trend;

pub use pool::{PoolMetrics, ValuationConfidence};
pub use raw::RawRecord;
pub use score::{DimensionBreakdown, ScoredPool};
pub use trend::TrendPoint;
