//! Core traits for the CourseBundler backend.
//!
//! This module defines the seams between the services and everything they
//! orchestrate: the document store, the statistics snapshot store, the
//! change-trigger interface and the external collaborators (media storage,
//! payment gateway, email).

use async_trait::async_trait;

use crate::error::AppResult;
use crate::snapshot::{Snapshot, SnapshotPatch};
use crate::types::{Course, Media, MediaKind, Payment, Upload, User};

/// Trait for document stores holding users, courses and payments.
///
/// Adapters implement this trait to provide persistence for the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ==================== User Operations ====================

    /// Creates a new user. Fails with `DuplicateEntry` on a taken email.
    async fn create_user(&self, user: &User) -> AppResult<User>;

    /// Gets a user by ID.
    async fn get_user_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Updates an existing user.
    async fn update_user(&self, user: &User) -> AppResult<User>;

    /// Deletes a user by ID.
    async fn delete_user(&self, id: &str) -> AppResult<()>;

    /// Lists all users, oldest first.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    // ==================== Course Operations ====================

    /// Creates a new course.
    async fn create_course(&self, course: &Course) -> AppResult<Course>;

    /// Gets a course by ID.
    async fn get_course(&self, id: &str) -> AppResult<Option<Course>>;

    /// Updates an existing course.
    async fn update_course(&self, course: &Course) -> AppResult<Course>;

    /// Deletes a course by ID.
    async fn delete_course(&self, id: &str) -> AppResult<()>;

    /// Lists all courses, oldest first.
    async fn list_courses(&self) -> AppResult<Vec<Course>>;

    // ==================== Payment Operations ====================

    /// Records a verified payment.
    async fn create_payment(&self, payment: &Payment) -> AppResult<Payment>;

    /// Gets the payments recorded for a user.
    async fn get_payments_by_user_id(&self, user_id: &str) -> AppResult<Vec<Payment>> {
        let _ = user_id;
        Ok(Vec::new())
    }
}

/// Full-scan aggregates read by the statistics observer.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    /// Counts all registered accounts.
    async fn count_users(&self) -> AppResult<u64>;

    /// Counts accounts whose subscription status is active.
    async fn count_active_subscriptions(&self) -> AppResult<u64>;

    /// Sums the view counters of every course.
    async fn total_course_views(&self) -> AppResult<u64>;
}

/// Persistence for statistics snapshots.
///
/// The store keeps an explicit reference to the current row instead of
/// relying on sort-and-limit, so two rows sharing a timestamp can never make
/// the current one ambiguous.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns up to `limit` snapshots, most recent `created_at` first.
    async fn recent_snapshots(&self, limit: usize) -> AppResult<Vec<Snapshot>>;

    /// Returns the current snapshot, or `None` before bootstrap.
    async fn current_snapshot(&self) -> AppResult<Option<Snapshot>>;

    /// Inserts a snapshot and makes it the current one.
    async fn append_snapshot(&self, snapshot: &Snapshot) -> AppResult<Snapshot>;

    /// Patches the current snapshot in place.
    ///
    /// With `expected_version` set, fails with `SnapshotConflict` when the
    /// stored version differs. Fails with `MissingCurrentSnapshot` when no
    /// row has been seeded.
    async fn update_current(
        &self,
        patch: &SnapshotPatch,
        expected_version: Option<u64>,
    ) -> AppResult<Snapshot>;

    /// Counts stored snapshots.
    async fn snapshot_count(&self) -> AppResult<usize>;
}

/// Change-trigger interface.
///
/// Anything that commits a User or Course mutation calls the matching
/// method afterwards. Implementations decide whether the recomputation runs
/// inline or is dispatched elsewhere.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    /// Signals that something in the User collection changed.
    async fn notify_user_changed(&self) -> AppResult<()>;

    /// Signals that something in the Course collection changed.
    async fn notify_course_changed(&self) -> AppResult<()>;
}

/// Object storage for avatars, posters and lecture videos.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Uploads a file and returns its reference.
    async fn upload(&self, upload: &Upload, kind: MediaKind) -> AppResult<Media>;

    /// Deletes a previously uploaded file.
    async fn destroy(&self, public_id: &str, kind: MediaKind) -> AppResult<()>;
}

/// Subscription payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key handed to the frontend checkout.
    fn key_id(&self) -> &str;

    /// Creates a subscription for a plan and returns its gateway id.
    async fn create_subscription(&self, plan_id: &str) -> AppResult<String>;

    /// Cancels a subscription at the gateway.
    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<()>;
}

/// Outbound email delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a plain-text email.
    async fn send(&self, to: &str, subject: &str, text: &str) -> AppResult<()>;
}
