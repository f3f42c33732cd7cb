//! # CourseBundler Server
//!
//! Standalone API server. Wires the in-memory store, the change-event bus,
//! the statistics observer and the catalog services behind the Axum router,
//! then serves it.
//!
//! Media, mail and payments use the in-process fakes from the memory
//! adapter; production deployments swap in real collaborators through
//! [`CatalogDeps`].

mod config;
mod logging;

pub use config::{
    AppConfig, ConfigError, MailConfig, PaymentsConfig, ServerConfig, StatsConfig, load_config,
    load_config_or_default,
};
pub use logging::init_logging;

use axum::Router;
use coursebundler_adapter_memory::{MemoryAdapter, MemoryMediaStorage, RecordingMailer, StaticPaymentGateway};
use coursebundler_axum::{AppState, api_router};
use coursebundler_catalog::{CatalogConfig, CatalogDeps, CatalogServices};
use coursebundler_core::error::{AppError, AppResult};
use coursebundler_events::EventBus;
use coursebundler_stats::{
    BusNotifier, DashboardAggregator, ObserverConfig, StatsBootstrap, StatsEventHandler, StatsObserver,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A fully wired application, ready to serve.
pub struct CourseApp {
    pub router: Router,
    pub store: Arc<MemoryAdapter>,
    /// Periodic rollover task, when enabled.
    pub rollover: Option<JoinHandle<()>>,
}

/// The CourseBundler API server.
pub struct CourseServer {
    /// Server configuration.
    pub config: AppConfig,
}

impl CourseServer {
    /// Creates a new server.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Builds the router and background tasks without binding a socket.
    pub async fn build(&self) -> AppResult<CourseApp> {
        let store = Arc::new(MemoryAdapter::new());
        let stats = &self.config.stats;

        let observer_config = if stats.conditional_updates {
            ObserverConfig::conditional(stats.max_update_attempts)
        } else {
            ObserverConfig::unconditional()
        };
        let observer = Arc::new(StatsObserver::with_config(
            store.clone(),
            store.clone(),
            observer_config,
        ));

        let bootstrap = Arc::new(StatsBootstrap::new(store.clone(), observer.clone()));
        bootstrap.ensure_seeded().await?;

        let bus = Arc::new(EventBus::new());
        StatsEventHandler::new(observer)
            .register(&bus)
            .await
            .map_err(|e| AppError::internal(format!("failed to subscribe stats handler: {e}")))?;

        let services = CatalogServices::new(
            CatalogDeps {
                store: store.clone(),
                media: Arc::new(MemoryMediaStorage::new()),
                payments: Arc::new(StaticPaymentGateway::new(self.config.payments.key_id.as_str())),
                mailer: Arc::new(RecordingMailer::new()),
                notifier: Arc::new(BusNotifier::new(bus)),
            },
            CatalogConfig {
                plan_id: self.config.payments.plan_id.clone(),
                payment_secret: self.config.payments.key_secret.clone(),
                contact_inbox: self.config.mail.inbox.clone(),
            },
        );

        let state = AppState::new(services, DashboardAggregator::new(store.clone()), store.clone())
            .with_frontend_url(self.config.server.frontend_url.as_str());

        let rollover = match stats.rollover_interval_secs {
            0 => None,
            secs => Some(bootstrap.spawn_rollover(Duration::from_secs(secs))),
        };

        Ok(CourseApp {
            router: api_router(state),
            store,
            rollover,
        })
    }

    /// Starts the server.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.build().await?;
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Starting CourseBundler server on {}", addr);

        axum::serve(listener, app.router).await?;
        Ok(())
    }
}

impl Default for CourseServer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
