use crate::domain::indicator::{IndicatorKey, IndicatorSnapshot, SnapshotSet};
use crate::ingest::provider::DataSource;
use crate::ingest::refresh::{refresh_snapshot_set, IndicatorConfig, RefreshOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

/// In-memory holder of the current [`SnapshotSet`].
///
/// The set is swapped as a whole behind a single `Arc`, so a reader always
/// sees one refresh cycle's values and never a mix of two.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    tx: Arc<watch::Sender<Arc<SnapshotSet>>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(SnapshotSet::empty()));
        Self { tx: Arc::new(tx) }
    }

    /// The set in effect right now; empty before the first successful refresh.
    pub fn current(&self) -> Arc<SnapshotSet> {
        self.tx.borrow().clone()
    }

    pub fn get(&self, key: IndicatorKey) -> Option<IndicatorSnapshot> {
        self.current().get(key).cloned()
    }

    pub fn replace(&self, set: SnapshotSet) {
        self.tx.send_replace(Arc::new(set));
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SnapshotSet>> {
        self.tx.subscribe()
    }

    /// Runs one refresh cycle. The new set replaces the old one wholesale, so an
    /// indicator that failed this time disappears; if every indicator failed the
    /// previous set stays in place.
    pub async fn refresh_once(
        &self,
        source: &dyn DataSource,
        indicators: &[IndicatorConfig],
        limit: u32,
    ) -> RefreshOutcome {
        let outcome = refresh_snapshot_set(source, indicators, limit).await;
        if outcome.is_total_failure() {
            tracing::error!(
                failed = outcome.failed.len(),
                kept = self.current().len(),
                "refresh cycle fetched nothing; keeping previous snapshot set"
            );
        } else {
            self.replace(outcome.set.clone());
        }
        outcome
    }
}

/// Startup refresh followed by [`run_refresh_loop`]. Meant to be spawned so the
/// caller can start serving while the first cycle is still fetching.
pub async fn run_refresh_service(
    store: SnapshotStore,
    source: Arc<dyn DataSource>,
    indicators: Vec<IndicatorConfig>,
    limit: u32,
    period: Duration,
) {
    let outcome = store.refresh_once(source.as_ref(), &indicators, limit).await;
    tracing::info!(
        indicators = outcome.set.len(),
        failed = outcome.failed.len(),
        "initial refresh finished"
    );
    run_refresh_loop(store, source, indicators, limit, period).await;
}

/// Refreshes `store` every `period`, forever. Cycles never overlap: a slow cycle
/// pushes the next tick back instead of stacking ticks up.
///
/// The first tick fires one `period` after the call; do the startup refresh before.
pub async fn run_refresh_loop(
    store: SnapshotStore,
    source: Arc<dyn DataSource>,
    indicators: Vec<IndicatorConfig>,
    limit: u32,
    period: Duration,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let outcome = store.refresh_once(source.as_ref(), &indicators, limit).await;
        tracing::info!(
            indicators = store.current().len(),
            failed = outcome.failed.len(),
            "periodic refresh finished"
        );
    }
}
