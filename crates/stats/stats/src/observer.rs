//! Change observer keeping the current snapshot in step with the catalog.
//!
//! Every signal triggers a full recomputation of the affected axis and an
//! in-place patch of the current row. Rows are never created here; seeding
//! and rollover live in [`crate::bootstrap`].

use async_trait::async_trait;
use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::snapshot::{Snapshot, SnapshotPatch};
use coursebundler_core::traits::{AggregateSource, ChangeNotifier, SnapshotStore};
use std::sync::Arc;

/// Write policy for the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Issue compare-and-swap updates against the row version.
    pub conditional_updates: bool,
    /// Attempts per signal before a conflict is surfaced.
    pub max_attempts: u32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            conditional_updates: false,
            max_attempts: 5,
        }
    }
}

impl ObserverConfig {
    /// Last-write-wins updates.
    pub fn unconditional() -> Self {
        Self::default()
    }

    /// Compare-and-swap updates retried up to `max_attempts` times.
    pub fn conditional(max_attempts: u32) -> Self {
        Self {
            conditional_updates: true,
            max_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Users,
    Views,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Axis::Users => "users",
            Axis::Views => "views",
        }
    }
}

/// Recomputes aggregates on change signals and writes them to the current
/// snapshot.
pub struct StatsObserver {
    store: Arc<dyn SnapshotStore>,
    source: Arc<dyn AggregateSource>,
    config: ObserverConfig,
}

impl StatsObserver {
    pub fn new(store: Arc<dyn SnapshotStore>, source: Arc<dyn AggregateSource>) -> Self {
        Self::with_config(store, source, ObserverConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn SnapshotStore>,
        source: Arc<dyn AggregateSource>,
        config: ObserverConfig,
    ) -> Self {
        Self {
            store,
            source,
            config,
        }
    }

    pub fn config(&self) -> ObserverConfig {
        self.config
    }

    /// Recomputes `users` and `subscriptions` and patches the current row.
    pub async fn on_user_changed(&self) -> AppResult<Snapshot> {
        self.write_axis(Axis::Users).await
    }

    /// Recomputes `views` and patches the current row.
    pub async fn on_course_changed(&self) -> AppResult<Snapshot> {
        self.write_axis(Axis::Views).await
    }

    /// Computes all three metrics into a fresh, unsaved snapshot.
    pub async fn recompute_all(&self) -> AppResult<Snapshot> {
        let users = self.source.count_users().await?;
        let subscriptions = self.source.count_active_subscriptions().await?;
        let views = self.source.total_course_views().await?;
        Ok(Snapshot::new(users, subscriptions, views))
    }

    async fn compute(&self, axis: Axis) -> AppResult<SnapshotPatch> {
        match axis {
            Axis::Users => {
                let users = self.source.count_users().await?;
                let subscriptions = self.source.count_active_subscriptions().await?;
                Ok(SnapshotPatch::user_axis(users, subscriptions))
            }
            Axis::Views => {
                let views = self.source.total_course_views().await?;
                Ok(SnapshotPatch::course_axis(views))
            }
        }
    }

    async fn write_axis(&self, axis: Axis) -> AppResult<Snapshot> {
        if !self.config.conditional_updates {
            let patch = self.compute(axis).await?;
            let updated = self.store.update_current(&patch, None).await?;
            tracing::debug!(
                axis = axis.name(),
                users = updated.users,
                subscriptions = updated.subscriptions,
                views = updated.views,
                "Updated current snapshot"
            );
            return Ok(updated);
        }

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;

            let current = self
                .store
                .current_snapshot()
                .await?
                .ok_or(AppError::MissingCurrentSnapshot)?;
            let patch = self.compute(axis).await?;

            match self.store.update_current(&patch, Some(current.version)).await {
                Ok(updated) => {
                    tracing::debug!(
                        axis = axis.name(),
                        attempt,
                        version = updated.version,
                        "Updated current snapshot"
                    );
                    return Ok(updated);
                }
                Err(AppError::SnapshotConflict { expected, found }) if attempt < max_attempts => {
                    tracing::warn!(
                        axis = axis.name(),
                        attempt,
                        expected,
                        found,
                        "Snapshot changed underneath update, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ChangeNotifier for StatsObserver {
    async fn notify_user_changed(&self) -> AppResult<()> {
        self.on_user_changed().await.map(|_| ())
    }

    async fn notify_course_changed(&self) -> AppResult<()> {
        self.on_course_changed().await.map(|_| ())
    }
}
