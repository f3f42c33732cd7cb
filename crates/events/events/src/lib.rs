//! # CourseBundler Events
//!
//! Change-event bus for CourseBundler providing:
//! - Payload-free change signals per collection (`user`, `course`)
//! - Pub/sub dispatch with pattern subscriptions
//! - Background or sequential fire-and-forget emission
//!
//! ## Example
//!
//! ```rust,ignore
//! use coursebundler_events::{ChangeEvent, EventBus};
//!
//! let bus = EventBus::new();
//! bus.on("course.*", views_handler).await?;
//!
//! // after a committed course write
//! bus.emit(ChangeEvent::course_changed().with_source("catalog")).await;
//! ```

mod bus;
mod error;
mod event;
mod handler;

pub use bus::EventBus;
pub use error::{EventError, EventResult};
pub use event::{ChangeEvent, Collection};
pub use handler::EventHandler;

/// Standard topic patterns.
pub mod catalog_events {
    /// Emitted after any committed user mutation.
    pub const USER_CHANGED: &str = "user.changed";
    /// Emitted after any committed course mutation.
    pub const COURSE_CHANGED: &str = "course.changed";
    /// Every user event.
    pub const USER_ALL: &str = "user.*";
    /// Every course event.
    pub const COURSE_ALL: &str = "course.*";
}
