//! Seeding and periodic rollover of the snapshot series.

use coursebundler_core::error::AppResult;
use coursebundler_core::snapshot::Snapshot;
use coursebundler_core::traits::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::observer::StatsObserver;

/// Appends snapshot rows. The observer only ever patches the current one.
pub struct StatsBootstrap {
    store: Arc<dyn SnapshotStore>,
    observer: Arc<StatsObserver>,
}

impl StatsBootstrap {
    pub fn new(store: Arc<dyn SnapshotStore>, observer: Arc<StatsObserver>) -> Self {
        Self { store, observer }
    }

    /// Seeds the first row when none is current.
    ///
    /// Returns the seeded snapshot, or `None` if one already existed.
    pub async fn ensure_seeded(&self) -> AppResult<Option<Snapshot>> {
        if self.store.current_snapshot().await?.is_some() {
            return Ok(None);
        }

        let seeded = self
            .store
            .append_snapshot(&self.observer.recompute_all().await?)
            .await?;
        tracing::info!(
            users = seeded.users,
            subscriptions = seeded.subscriptions,
            views = seeded.views,
            "Seeded statistics snapshot"
        );
        Ok(Some(seeded))
    }

    /// Starts a new period. The previous current row becomes history.
    pub async fn roll_over(&self) -> AppResult<Snapshot> {
        let snapshot = self
            .store
            .append_snapshot(&self.observer.recompute_all().await?)
            .await?;
        tracing::info!(id = %snapshot.id, "Rolled statistics over to a new period");
        Ok(snapshot)
    }

    /// Runs [`roll_over`](Self::roll_over) every `every`, first tick one
    /// full period from now.
    pub fn spawn_rollover(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + every;
            let mut ticker = tokio::time::interval_at(start, every);
            loop {
                ticker.tick().await;
                if let Err(e) = self.roll_over().await {
                    tracing::error!("Statistics rollover failed: {}", e);
                }
            }
        })
    }
}
