//! # CourseBundler Memory Adapter
//!
//! An in-memory document store for CourseBundler, primarily intended
//! for testing and development. It implements the catalog store, the
//! aggregate source and the snapshot store, and ships fakes for the
//! external collaborators in [`fakes`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coursebundler_adapter_memory::MemoryAdapter;
//!
//! let adapter = Arc::new(MemoryAdapter::new());
//! let observer = StatsObserver::new(adapter.clone(), adapter.clone());
//! ```

pub mod fakes;

pub use fakes::{MemoryMediaStorage, RecordingMailer, RecordingNotifier, SentMail, StaticPaymentGateway};

use async_trait::async_trait;
use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::snapshot::{Snapshot, SnapshotPatch};
use coursebundler_core::traits::{AggregateSource, CatalogStore, SnapshotStore};
use coursebundler_core::types::{Course, Payment, User};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for a single entity type.
type Store<T> = Arc<RwLock<HashMap<String, T>>>;

/// Snapshot rows plus the explicit pointer to the current one.
#[derive(Debug, Default)]
struct SnapshotTable {
    rows: Vec<Snapshot>,
    current: Option<String>,
}

impl SnapshotTable {
    fn current(&self) -> Option<&Snapshot> {
        let id = self.current.as_deref()?;
        self.rows.iter().find(|s| s.id == id)
    }

    fn current_mut(&mut self) -> Option<&mut Snapshot> {
        let id = self.current.as_deref()?;
        self.rows.iter_mut().find(|s| s.id == id)
    }
}

/// In-memory storage adapter for CourseBundler.
///
/// Data is lost when the process exits.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    users: Store<User>,
    courses: Store<Course>,
    payments: Store<Payment>,
    snapshots: Arc<RwLock<SnapshotTable>>,
}

impl MemoryAdapter {
    /// Creates a new in-memory adapter.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            courses: Arc::new(RwLock::new(HashMap::new())),
            payments: Arc::new(RwLock::new(HashMap::new())),
            snapshots: Arc::new(RwLock::new(SnapshotTable::default())),
        }
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.courses.write().await.clear();
        self.payments.write().await.clear();
        *self.snapshots.write().await = SnapshotTable::default();
    }

    /// Returns the number of users stored.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns the number of courses stored.
    pub async fn course_count(&self) -> usize {
        self.courses.read().await.len()
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryAdapter {
    // ==================== User Operations ====================

    async fn create_user(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::duplicate("user", "email", &user.email));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(AppError::not_found("user", "id", &user.id));
        }
        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(AppError::duplicate("user", "email", &user.email));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.users.write().await.remove(id);
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    // ==================== Course Operations ====================

    async fn create_course(&self, course: &Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;

        if courses.contains_key(&course.id) {
            return Err(AppError::duplicate("course", "id", &course.id));
        }

        courses.insert(course.id.clone(), course.clone());
        Ok(course.clone())
    }

    async fn get_course(&self, id: &str) -> AppResult<Option<Course>> {
        let courses = self.courses.read().await;
        Ok(courses.get(id).cloned())
    }

    async fn update_course(&self, course: &Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;

        if !courses.contains_key(&course.id) {
            return Err(AppError::not_found("course", "id", &course.id));
        }

        courses.insert(course.id.clone(), course.clone());
        Ok(course.clone())
    }

    async fn delete_course(&self, id: &str) -> AppResult<()> {
        self.courses.write().await.remove(id);
        Ok(())
    }

    async fn list_courses(&self) -> AppResult<Vec<Course>> {
        let courses = self.courses.read().await;
        let mut list: Vec<Course> = courses.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    // ==================== Payment Operations ====================

    async fn create_payment(&self, payment: &Payment) -> AppResult<Payment> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id.clone(), payment.clone());
        Ok(payment.clone())
    }

    async fn get_payments_by_user_id(&self, user_id: &str) -> AppResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AggregateSource for MemoryAdapter {
    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn count_active_subscriptions(&self) -> AppResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.has_active_subscription()).count() as u64)
    }

    async fn total_course_views(&self) -> AppResult<u64> {
        let courses = self.courses.read().await;
        Ok(courses.values().map(|c| c.views).sum())
    }
}

#[async_trait]
impl SnapshotStore for MemoryAdapter {
    async fn recent_snapshots(&self, limit: usize) -> AppResult<Vec<Snapshot>> {
        let table = self.snapshots.read().await;
        // Newest rows first so that the stable sort keeps later inserts ahead on ties.
        let mut rows: Vec<Snapshot> = table.rows.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn current_snapshot(&self) -> AppResult<Option<Snapshot>> {
        let table = self.snapshots.read().await;
        Ok(table.current().cloned())
    }

    async fn append_snapshot(&self, snapshot: &Snapshot) -> AppResult<Snapshot> {
        let mut table = self.snapshots.write().await;

        if table.rows.iter().any(|s| s.id == snapshot.id) {
            return Err(AppError::duplicate("snapshot", "id", &snapshot.id));
        }

        table.rows.push(snapshot.clone());
        table.current = Some(snapshot.id.clone());
        tracing::debug!(id = %snapshot.id, "Appended current snapshot");
        Ok(snapshot.clone())
    }

    async fn update_current(
        &self,
        patch: &SnapshotPatch,
        expected_version: Option<u64>,
    ) -> AppResult<Snapshot> {
        let mut table = self.snapshots.write().await;
        let current = table.current_mut().ok_or(AppError::MissingCurrentSnapshot)?;

        if let Some(expected) = expected_version {
            if current.version != expected {
                return Err(AppError::SnapshotConflict {
                    expected,
                    found: current.version,
                });
            }
        }

        current.apply(patch);
        Ok(current.clone())
    }

    async fn snapshot_count(&self) -> AppResult<usize> {
        Ok(self.snapshots.read().await.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use coursebundler_core::types::{Media, Subscription, SubscriptionStatus};

    fn media(id: &str) -> Media {
        Media {
            public_id: id.to_string(),
            url: format!("memory://{id}"),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let adapter = MemoryAdapter::new();
        let user = User::new("Asha", "asha@example.com", media("a"));

        adapter.create_user(&user).await.unwrap();

        let fetched = adapter.get_user_by_email("asha@example.com").await.unwrap();
        assert_eq!(fetched.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let adapter = MemoryAdapter::new();
        adapter
            .create_user(&User::new("A", "same@example.com", media("a")))
            .await
            .unwrap();

        let result = adapter
            .create_user(&User::new("B", "same@example.com", media("b")))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEntry { .. })));
    }

    #[tokio::test]
    async fn test_aggregates() {
        let adapter = MemoryAdapter::new();

        let mut subscriber = User::new("A", "a@example.com", media("a"));
        subscriber.subscription = Some(Subscription {
            id: "sub_1".to_string(),
            status: SubscriptionStatus::Active,
        });
        let mut pending = User::new("B", "b@example.com", media("b"));
        pending.subscription = Some(Subscription {
            id: "sub_2".to_string(),
            status: SubscriptionStatus::Created,
        });
        adapter.create_user(&subscriber).await.unwrap();
        adapter.create_user(&pending).await.unwrap();

        let mut rust = Course::new("Rust", "d", "Programming", "A", media("p1"));
        rust.views = 7;
        let mut go = Course::new("Go", "d", "Programming", "A", media("p2"));
        go.views = 5;
        adapter.create_course(&rust).await.unwrap();
        adapter.create_course(&go).await.unwrap();

        assert_eq!(adapter.count_users().await.unwrap(), 2);
        assert_eq!(adapter.count_active_subscriptions().await.unwrap(), 1);
        assert_eq!(adapter.total_course_views().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_update_without_seed_fails() {
        let adapter = MemoryAdapter::new();
        let result = adapter.update_current(&SnapshotPatch::course_axis(3), None).await;
        assert!(matches!(result, Err(AppError::MissingCurrentSnapshot)));
    }

    #[tokio::test]
    async fn test_recent_snapshots_ordering() {
        let adapter = MemoryAdapter::new();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for month in 0..5 {
            let snapshot = Snapshot::at(month, 0, 0, base + Duration::days(30 * month as i64));
            adapter.append_snapshot(&snapshot).await.unwrap();
        }

        let recent = adapter.recent_snapshots(3).await.unwrap();
        let users: Vec<u64> = recent.iter().map(|s| s.users).collect();
        assert_eq!(users, vec![4, 3, 2]);
        assert_eq!(adapter.snapshot_count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_current_is_explicit_on_timestamp_tie() {
        let adapter = MemoryAdapter::new();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        adapter.append_snapshot(&Snapshot::at(1, 0, 0, at)).await.unwrap();
        let second = adapter.append_snapshot(&Snapshot::at(2, 0, 0, at)).await.unwrap();

        let current = adapter.current_snapshot().await.unwrap().unwrap();
        assert_eq!(current.id, second.id);

        let updated = adapter
            .update_current(&SnapshotPatch::user_axis(9, 0), None)
            .await
            .unwrap();
        assert_eq!(updated.id, second.id);
        assert_eq!(updated.users, 9);
    }

    #[tokio::test]
    async fn test_conditional_update_detects_stale_version() {
        let adapter = MemoryAdapter::new();
        adapter.append_snapshot(&Snapshot::new(0, 0, 0)).await.unwrap();

        adapter
            .update_current(&SnapshotPatch::course_axis(1), Some(0))
            .await
            .unwrap();
        let stale = adapter
            .update_current(&SnapshotPatch::course_axis(2), Some(0))
            .await;

        assert!(matches!(
            stale,
            Err(AppError::SnapshotConflict { expected: 0, found: 1 })
        ));
    }
}
