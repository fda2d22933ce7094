use clap::{Parser, Subcommand};
use lpscope::TrendMetric;

#[derive(Debug, Parser)]
#[clap(name = "lpscope", version, about = "Liquidity-pool snapshot cache and trend index")]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Keep the pool cache refreshed in the background until Ctrl-C
    Serve,

    /// Every pool, score-descending
    Pools,

    /// Look up a pool by its two assets (exact, then fuzzy)
    Pair { asset_a: String, asset_b: String },

    /// Look up a pool by id
    Pool { pool_id: String },

    /// Historical series for a pool
    Trend {
        pool_id: String,

        /// Print a single metric series instead of full points
        #[clap(long)]
        metric: Option<TrendMetric>,
    },

    /// Aggregate over pools issued by one account
    Issuer { issuer: String },

    /// Pools carrying warnings
    Alerts,
}
