//! Core data types for the CourseBundler backend.
//!
//! This module defines the `User` and `Course` documents plus the small
//! value types they embed (media references, subscriptions, playlist items).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Returns the other role (user ↔ admin).
    pub fn toggled(self) -> Self {
        match self {
            Role::User => Role::Admin,
            Role::Admin => Role::User,
        }
    }
}

/// Reference to a file held by the media storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Identifier used to delete the file later.
    pub public_id: String,
    /// Public URL of the file.
    pub url: String,
}

/// Kind of media stored, which decides how the storage service processes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A file received from a client, fully buffered in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates a new upload.
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Returns true if the upload carries no data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Lifecycle of a gateway subscription as seen by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Created at the gateway, payment not yet verified.
    Created,
    /// Payment verified.
    Active,
}

/// A user's subscription at the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Gateway subscription id.
    pub id: String,
    pub status: SubscriptionStatus,
}

/// A course bookmarked by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub course_id: String,
    pub poster: String,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    pub avatar: Media,
    #[serde(default)]
    pub playlist: Vec<PlaylistItem>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the `user` role and an empty playlist.
    pub fn new(name: impl Into<String>, email: impl Into<String>, avatar: Media) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            role: Role::User,
            subscription: None,
            avatar,
            playlist: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns true if the user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if the user's subscription is active.
    pub fn has_active_subscription(&self) -> bool {
        matches!(
            self.subscription,
            Some(Subscription {
                status: SubscriptionStatus::Active,
                ..
            })
        )
    }

    /// Returns true if the course is already in the playlist.
    pub fn has_in_playlist(&self, course_id: &str) -> bool {
        self.playlist.iter().any(|item| item.course_id == course_id)
    }
}

/// A single video lecture inside a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: String,
    pub title: String,
    pub description: String,
    pub video: Media,
}

impl Lecture {
    /// Creates a new lecture.
    pub fn new(title: impl Into<String>, description: impl Into<String>, video: Media) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            video,
        }
    }
}

/// A course in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub poster: Media,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    /// Incremented every time the lectures are fetched.
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub num_of_videos: u64,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a new course without lectures.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        created_by: impl Into<String>,
        poster: Media,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            created_by: created_by.into(),
            poster,
            lectures: Vec::new(),
            views: 0,
            num_of_videos: 0,
            created_at: Utc::now(),
        }
    }

    /// Keeps `num_of_videos` in step with the lecture list.
    pub fn sync_video_count(&mut self) {
        self.num_of_videos = self.lectures.len() as u64;
    }
}

/// Course as shown in the public listing, without lectures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub poster: Media,
    pub views: u64,
    pub num_of_videos: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            category: course.category,
            created_by: course.created_by,
            poster: course.poster,
            views: course.views,
            num_of_videos: course.num_of_videos,
            created_at: course.created_at,
        }
    }
}

/// A verified subscription payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub payment_id: String,
    pub subscription_id: String,
    pub signature: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment record.
    pub fn new(
        user_id: impl Into<String>,
        payment_id: impl Into<String>,
        subscription_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            payment_id: payment_id.into(),
            subscription_id: subscription_id.into(),
            signature: signature.into(),
            created_at: Utc::now(),
        }
    }
}
