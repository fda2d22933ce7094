use std::time::{Duration, Instant};

use tracing::Span;

use super::TraceId;

/// Create a root span for a refresh pass / index build / CLI command
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str()
    )
}

/// Runs `op` and emits a `performance` warning when it takes longer than `max`.
pub fn warn_if_slow<F, T>(label: &'static str, max: Duration, op: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = op();
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
