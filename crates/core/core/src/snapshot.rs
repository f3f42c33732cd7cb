//! Platform statistics snapshots.
//!
//! A `Snapshot` holds the aggregate metrics of the whole platform at a point
//! in time. Exactly one row is *current*; live change events patch it in
//! place through a [`SnapshotPatch`], and periodic rollover appends a new
//! current row so older ones become history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of aggregate platform metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    /// Registered accounts.
    pub users: u64,
    /// Accounts with an active subscription.
    #[serde(rename = "subscription")]
    pub subscriptions: u64,
    /// Sum of view counters across all courses.
    pub views: u64,
    pub created_at: DateTime<Utc>,
    /// Bumped on every in-place update; used for conditional writes.
    #[serde(default)]
    pub version: u64,
}

impl Snapshot {
    /// Creates a snapshot timestamped now.
    pub fn new(users: u64, subscriptions: u64, views: u64) -> Self {
        Self::at(users, subscriptions, views, Utc::now())
    }

    /// Creates a snapshot with an explicit timestamp.
    pub fn at(users: u64, subscriptions: u64, views: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            users,
            subscriptions,
            views,
            created_at,
            version: 0,
        }
    }

    /// Applies a patch in place and bumps the version.
    pub fn apply(&mut self, patch: &SnapshotPatch) {
        if let Some(users) = patch.users {
            self.users = users;
        }
        if let Some(subscriptions) = patch.subscriptions {
            self.subscriptions = subscriptions;
        }
        if let Some(views) = patch.views {
            self.views = views;
        }
        self.created_at = patch.created_at;
        self.version += 1;
    }
}

/// Partial update for the current snapshot.
///
/// Unset metrics are left untouched; the timestamp is always refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPatch {
    pub users: Option<u64>,
    pub subscriptions: Option<u64>,
    pub views: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl SnapshotPatch {
    /// Patch for the user axis (accounts and active subscriptions).
    pub fn user_axis(users: u64, subscriptions: u64) -> Self {
        Self {
            users: Some(users),
            subscriptions: Some(subscriptions),
            views: None,
            created_at: Utc::now(),
        }
    }

    /// Patch for the course axis (total views).
    pub fn course_axis(views: u64) -> Self {
        Self {
            users: None,
            subscriptions: None,
            views: Some(views),
            created_at: Utc::now(),
        }
    }
}
