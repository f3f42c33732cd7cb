//! # CourseBundler Stats
//!
//! Rolling platform statistics:
//! - [`StatsObserver`] patches the current snapshot on change signals
//! - [`DashboardAggregator`] derives period-over-period trends
//! - [`StatsBootstrap`] seeds the series and rolls it over
//! - [`BusNotifier`] / [`StatsEventHandler`] route signals over the event bus
//!
//! ## Example
//!
//! ```rust,ignore
//! let observer = Arc::new(StatsObserver::new(store.clone(), store.clone()));
//! StatsBootstrap::new(store.clone(), observer.clone()).ensure_seeded().await?;
//!
//! observer.notify_user_changed().await?;
//! let dashboard = DashboardAggregator::new(store).dashboard().await?;
//! ```

pub mod bootstrap;
pub mod bridge;
pub mod dashboard;
pub mod observer;

pub use bootstrap::StatsBootstrap;
pub use bridge::{BusNotifier, StatsEventHandler};
pub use dashboard::{DASHBOARD_WINDOW, DashboardAggregator, DashboardStats, MetricTrend, StatsPoint};
pub use observer::{ObserverConfig, StatsObserver};
