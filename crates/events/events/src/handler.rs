//! Event handler trait.

use async_trait::async_trait;

use crate::error::EventError;
use crate::event::ChangeEvent;

/// Trait for change event handlers.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns a unique identifier for this handler.
    fn id(&self) -> &str {
        "anonymous"
    }

    /// Handles an event.
    async fn handle(&self, event: &ChangeEvent) -> Result<(), EventError>;
}
