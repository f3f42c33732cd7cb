//! # CourseBundler Core
//!
//! This crate provides the foundational types and traits for the CourseBundler
//! backend. It defines the catalog documents (`User`, `Course`), statistics
//! snapshots, error types, and the trait interfaces that storage adapters and
//! external collaborators must implement.

pub mod error;
pub mod snapshot;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{AppError, AppResult};
pub use snapshot::{Snapshot, SnapshotPatch};
pub use traits::{
    AggregateSource, CatalogStore, ChangeNotifier, Mailer, MediaStorage, PaymentGateway,
    SnapshotStore,
};
pub use types::{
    Course, CourseSummary, Lecture, Media, MediaKind, Payment, PlaylistItem, Role, Subscription,
    SubscriptionStatus, Upload, User,
};
