//! Routes change signals through the event bus.
//!
//! [`BusNotifier`] turns trigger calls into `user.changed` /
//! `course.changed` events, and [`StatsEventHandler`] feeds those events
//! back into a [`StatsObserver`]. Dispatch is fire-and-forget, so a stats
//! fault never fails the write that caused it.

use async_trait::async_trait;
use coursebundler_core::error::AppResult;
use coursebundler_core::traits::ChangeNotifier;
use coursebundler_events::catalog_events::{COURSE_ALL, USER_ALL};
use coursebundler_events::{
    ChangeEvent, Collection, EventBus, EventError, EventHandler, EventResult,
};
use std::sync::Arc;

use crate::observer::StatsObserver;

/// Change notifier that publishes on an [`EventBus`].
#[derive(Clone)]
pub struct BusNotifier {
    bus: Arc<EventBus>,
    source: String,
}

impl BusNotifier {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            source: "catalog".to_string(),
        }
    }

    /// Tags emitted events with a different source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

#[async_trait]
impl ChangeNotifier for BusNotifier {
    async fn notify_user_changed(&self) -> AppResult<()> {
        self.bus
            .emit(ChangeEvent::user_changed().with_source(self.source.as_str()))
            .await;
        Ok(())
    }

    async fn notify_course_changed(&self) -> AppResult<()> {
        self.bus
            .emit(ChangeEvent::course_changed().with_source(self.source.as_str()))
            .await;
        Ok(())
    }
}

/// Event handler that recomputes statistics for the changed collection.
#[derive(Clone)]
pub struct StatsEventHandler {
    observer: Arc<StatsObserver>,
}

impl StatsEventHandler {
    pub fn new(observer: Arc<StatsObserver>) -> Self {
        Self { observer }
    }

    /// Subscribes one shared handler to every user and course event.
    pub async fn register(self, bus: &EventBus) -> EventResult<()> {
        let handler: Arc<dyn EventHandler> = Arc::new(self);
        bus.on_shared(USER_ALL, handler.clone()).await?;
        bus.on_shared(COURSE_ALL, handler).await
    }
}

#[async_trait]
impl EventHandler for StatsEventHandler {
    fn id(&self) -> &str {
        "stats-observer"
    }

    async fn handle(&self, event: &ChangeEvent) -> Result<(), EventError> {
        let result = match event.collection {
            Collection::User => self.observer.on_user_changed().await,
            Collection::Course => self.observer.on_course_changed().await,
        };
        result
            .map(|_| ())
            .map_err(|e| EventError::HandlerFailed(e.to_string()))
    }
}
