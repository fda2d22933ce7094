//! Background refresher for the pool cache.
//!
//! Periodically rebuilds the cache from the canonical pool file. Failures
//! are logged and the loop keeps going; the previous view stays published.
//!
//! Data flow:
//! Pool file → Normalizer → Scorer → PoolView → PoolCache

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, debug, error, info, warn};

use super::PoolCache;

impl PoolCache {
    /// Start the periodic refresh task. At most one runs per cache; returns
    /// `false` when one is already running or no tokio runtime is available.
    pub fn start_background_refresh(self: &Arc<Self>, every: Duration) -> bool {
        let mut slot = self.poller.lock();
        if slot.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("background refresh already running");
            return false;
        }

        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime; background refresh not started");
            return false;
        };

        let span = tracing::info_span!("pool_cache_poller", every_ms = every.as_millis() as u64);
        *slot = Some(handle.spawn(run_refresh_loop(Arc::clone(self), every).instrument(span)));
        true
    }

    /// Abort the periodic refresh task, if any.
    pub fn stop_background_refresh(&self) {
        if let Some(h) = self.poller.lock().take() {
            h.abort();
            info!("background refresh stopped");
        }
    }

    pub fn background_refresh_running(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

async fn run_refresh_loop(cache: Arc<PoolCache>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        path = %cache.config().pools_path.display(),
        every_ms = every.as_millis() as u64,
        "pool cache refresher started"
    );

    loop {
        ticker.tick().await;

        let c = Arc::clone(&cache);
        match tokio::task::spawn_blocking(move || c.refresh()).await {
            Ok(Ok(pools)) => debug!(pools, "background refresh complete"),
            Ok(Err(e)) => error!(error = %e, "background refresh failed; keeping previous view"),
            Err(e) => error!(error = %e, "background refresh task panicked"),
        }
    }
}
