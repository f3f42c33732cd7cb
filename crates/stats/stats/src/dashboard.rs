//! Month-over-month dashboard built from the most recent snapshots.

use coursebundler_core::error::AppResult;
use coursebundler_core::snapshot::Snapshot;
use coursebundler_core::traits::SnapshotStore;
use serde::Serialize;
use std::sync::Arc;

/// Number of periods shown on the dashboard.
pub const DASHBOARD_WINDOW: usize = 12;

/// One period of the dashboard series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsPoint {
    pub users: u64,
    pub subscription: u64,
    pub views: u64,
}

impl From<&Snapshot> for StatsPoint {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            users: snapshot.users,
            subscription: snapshot.subscriptions,
            views: snapshot.views,
        }
    }
}

/// Change of a single metric between the last two periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTrend {
    pub count: u64,
    pub percentage: f64,
    pub profit: bool,
}

impl MetricTrend {
    /// Compares `curr` against `prev`.
    ///
    /// A zero `prev` yields `curr * 100` and always reports profit.
    pub fn between(prev: u64, curr: u64) -> Self {
        if prev == 0 {
            return Self {
                count: curr,
                percentage: curr as f64 * 100.0,
                profit: true,
            };
        }

        let percentage = (curr as f64 - prev as f64) / prev as f64 * 100.0;
        Self {
            count: curr,
            percentage,
            profit: percentage >= 0.0,
        }
    }
}

/// Dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Exactly [`DASHBOARD_WINDOW`] points, oldest first.
    pub stats: Vec<StatsPoint>,
    pub users_count: u64,
    pub views_count: u64,
    pub sub_count: u64,
    pub users_percentage: f64,
    pub views_percentage: f64,
    pub sub_percentage: f64,
    pub users_profit: bool,
    pub views_profit: bool,
    pub sub_profit: bool,
}

impl DashboardStats {
    /// Builds the dashboard from snapshots ordered most recent first.
    ///
    /// Only the first [`DASHBOARD_WINDOW`] entries are used; shorter
    /// histories are left-padded with zero points.
    pub fn from_recent(recent: &[Snapshot]) -> Self {
        let real: Vec<StatsPoint> = recent
            .iter()
            .take(DASHBOARD_WINDOW)
            .rev()
            .map(StatsPoint::from)
            .collect();

        let mut stats = vec![StatsPoint::default(); DASHBOARD_WINDOW - real.len()];
        stats.extend(real);

        let curr = stats[DASHBOARD_WINDOW - 1];
        let prev = stats[DASHBOARD_WINDOW - 2];

        let users = MetricTrend::between(prev.users, curr.users);
        let views = MetricTrend::between(prev.views, curr.views);
        let subs = MetricTrend::between(prev.subscription, curr.subscription);

        Self {
            stats,
            users_count: users.count,
            views_count: views.count,
            sub_count: subs.count,
            users_percentage: users.percentage,
            views_percentage: views.percentage,
            sub_percentage: subs.percentage,
            users_profit: users.profit,
            views_profit: views.profit,
            sub_profit: subs.profit,
        }
    }

    pub fn users(&self) -> MetricTrend {
        MetricTrend {
            count: self.users_count,
            percentage: self.users_percentage,
            profit: self.users_profit,
        }
    }

    pub fn views(&self) -> MetricTrend {
        MetricTrend {
            count: self.views_count,
            percentage: self.views_percentage,
            profit: self.views_profit,
        }
    }

    pub fn subscriptions(&self) -> MetricTrend {
        MetricTrend {
            count: self.sub_count,
            percentage: self.sub_percentage,
            profit: self.sub_profit,
        }
    }
}

/// Read-only dashboard query over a snapshot store.
#[derive(Clone)]
pub struct DashboardAggregator {
    store: Arc<dyn SnapshotStore>,
}

impl DashboardAggregator {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let recent = self.store.recent_snapshots(DASHBOARD_WINDOW).await?;
        tracing::debug!(snapshots = recent.len(), "Building dashboard");
        Ok(DashboardStats::from_recent(&recent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_growth() {
        let trend = MetricTrend::between(10, 15);
        assert_eq!(trend.count, 15);
        assert!((trend.percentage - 50.0).abs() < 1e-9);
        assert!(trend.profit);
    }

    #[test]
    fn test_trend_unchanged_counts_as_profit() {
        let trend = MetricTrend::between(7, 7);
        assert_eq!(trend.percentage, 0.0);
        assert!(trend.profit);
    }

    #[test]
    fn test_trend_from_zero() {
        let trend = MetricTrend::between(0, 0);
        assert_eq!(trend.percentage, 0.0);
        assert!(trend.profit);
    }
}
