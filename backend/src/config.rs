use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Canonical "latest" pool list read by the pool cache.
    pub pools_path: PathBuf,

    // =========================
    // Trend configuration
    // =========================
    /// Directory holding timestamped snapshot files.
    pub snapshot_dir: PathBuf,

    /// Snapshot files are `<prefix>_<YYYYMMDD>_<HHMMSS>Z.json`.
    /// Files with the prefix but no parsable timestamp still participate
    /// using their modification time.
    pub snapshot_prefix: String,

    // =========================
    // Refresh configuration
    // =========================
    /// Period of the background refresh task.
    ///
    /// Readers tolerate data up to twice this old before forcing a
    /// synchronous refresh (see `staleness_threshold`).
    pub refresh_interval: Duration,

    /// Serve the bundled sample dataset when no real snapshot exists.
    pub fallback_sample: bool,

    /// Executable implementing the scorer bridge (CLI only).
    pub scorer_cmd: Option<PathBuf>,

    /// JSON logs.
    pub production: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pools_path: PathBuf::from("data/pools.json"),
            snapshot_dir: PathBuf::from("data"),
            snapshot_prefix: "pools".to_string(),
            refresh_interval: Duration::from_secs(5 * 60),
            fallback_sample: false,
            scorer_cmd: None,
            production: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same parsing as `from_env` over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let refresh_interval = match var("LPSCOPE_REFRESH_MINUTES") {
            Some(raw) => parse_minutes(&raw)?,
            None => defaults.refresh_interval,
        };

        let fallback_sample = match var("LPSCOPE_FALLBACK_SAMPLE") {
            Some(raw) => parse_bool("LPSCOPE_FALLBACK_SAMPLE", &raw)?,
            None => defaults.fallback_sample,
        };

        Ok(Self {
            pools_path: var("LPSCOPE_POOLS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.pools_path),
            snapshot_dir: var("LPSCOPE_SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_dir),
            snapshot_prefix: var("LPSCOPE_SNAPSHOT_PREFIX").unwrap_or(defaults.snapshot_prefix),
            refresh_interval,
            fallback_sample,
            scorer_cmd: var("LPSCOPE_SCORER_CMD").map(PathBuf::from),
            production: var("APP_ENV").as_deref() == Some("production"),
        })
    }

    /// Maximum age tolerated before a read forces a synchronous refresh.
    pub fn staleness_threshold(&self) -> Duration {
        self.refresh_interval.saturating_mul(2)
    }
}

fn parse_minutes(raw: &str) -> Result<Duration, AppError> {
    let invalid = |reason: &str| AppError::Config {
        key: "LPSCOPE_REFRESH_MINUTES",
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let minutes: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("not a number"))?;

    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(invalid("must be a positive number of minutes"));
    }

    let interval = Duration::try_from_secs_f64(minutes * 60.0)
        .map_err(|_| invalid("interval out of range"))?;

    // The staleness threshold is twice the interval; it must stay representable.
    if interval.checked_mul(2).is_none() {
        return Err(invalid("interval out of range"));
    }

    Ok(interval)
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Config {
            key,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
