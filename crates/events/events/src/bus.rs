//! Event bus for pub/sub communication.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EventError, EventResult};
use crate::event::ChangeEvent;
use crate::handler::EventHandler;

/// A handler registered under a pattern.
struct Subscription {
    pattern: String,
    handler: Arc<dyn EventHandler>,
}

/// The event bus for publishing and subscribing to change events.
pub struct EventBus {
    /// Subscribers in registration order.
    subscribers: RwLock<Vec<Subscription>>,
    /// Whether `emit` spawns handlers onto the runtime.
    parallel_handlers: bool,
}

impl EventBus {
    /// Creates a new event bus that dispatches `emit` in the background.
    pub fn new() -> Self {
        Self::with_config(true)
    }

    /// Creates an event bus with custom dispatch behavior.
    pub fn with_config(parallel_handlers: bool) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            parallel_handlers,
        }
    }

    /// Subscribes to a topic or pattern.
    ///
    /// Patterns support:
    /// - Exact match: "user.changed"
    /// - Collection wildcard: "user.*"
    /// - All events: "*"
    pub async fn on(&self, pattern: &str, handler: impl EventHandler + 'static) -> EventResult<()> {
        self.on_shared(pattern, Arc::new(handler)).await
    }

    /// Subscribes a shared handler, so one instance can serve several patterns.
    pub async fn on_shared(&self, pattern: &str, handler: Arc<dyn EventHandler>) -> EventResult<()> {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern.contains(char::is_whitespace) {
            return Err(EventError::InvalidPattern(pattern.to_string()));
        }

        tracing::debug!(pattern, handler = handler.id(), "Subscribed event handler");
        self.subscribers.write().await.push(Subscription {
            pattern: pattern.to_string(),
            handler,
        });
        Ok(())
    }

    /// Emits an event to all matching subscribers (fire and forget).
    ///
    /// Handler failures are logged, never returned. A sequential bus awaits
    /// each handler in registration order before returning.
    pub async fn emit(&self, event: ChangeEvent) {
        let handlers = self.collect_handlers(&event).await;

        if self.parallel_handlers {
            for handler in handlers {
                let event = event.clone();
                tokio::spawn(async move {
                    if let Err(e) = handler.handle(&event).await {
                        tracing::error!("Event handler '{}' error on {}: {}", handler.id(), event.topic(), e);
                    }
                });
            }
        } else {
            for handler in handlers {
                if let Err(e) = handler.handle(&event).await {
                    tracing::error!("Event handler '{}' error on {}: {}", handler.id(), event.topic(), e);
                }
            }
        }
    }

    /// Gets the number of subscribers registered under a pattern.
    pub async fn subscriber_count(&self, pattern: &str) -> usize {
        let subs = self.subscribers.read().await;
        subs.iter().filter(|s| s.pattern == pattern).count()
    }

    async fn collect_handlers(&self, event: &ChangeEvent) -> Vec<Arc<dyn EventHandler>> {
        let subs = self.subscribers.read().await;
        subs.iter()
            .filter(|s| event.matches(&s.pattern))
            .map(|s| s.handler.clone())
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
