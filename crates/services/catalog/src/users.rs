//! Accounts, profiles and playlists.

use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::traits::{CatalogStore, ChangeNotifier, MediaStorage};
use coursebundler_core::types::{MediaKind, PlaylistItem, Upload, User};
use serde::Deserialize;
use std::sync::Arc;

use crate::validation::{required, required_file, validate_email};

/// Registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Upload>,
}

/// Partial profile update; absent or blank fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn CatalogStore>,
    media: Arc<dyn MediaStorage>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        media: Arc<dyn MediaStorage>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            store,
            media,
            notifier,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        let name = required("name", input.name.as_deref())?;
        let email = required("email", input.email.as_deref())?;
        let avatar = required_file("file", input.avatar.as_ref())?;
        validate_email(email)?;

        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AppError::duplicate("user", "email", email));
        }

        let media = self.media.upload(avatar, MediaKind::Image).await?;
        let user = self.store.create_user(&User::new(name, email, media)).await?;
        self.notifier.notify_user_changed().await?;

        tracing::info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    pub async fn profile(&self, id: &str) -> AppResult<User> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    pub async fn update_profile(&self, id: &str, update: ProfileUpdate) -> AppResult<User> {
        let mut user = self.profile(id).await?;

        if let Some(name) = non_blank(update.name.as_deref()) {
            user.name = name.to_string();
        }
        if let Some(email) = non_blank(update.email.as_deref()) {
            validate_email(email)?;
            if email != user.email && self.store.get_user_by_email(email).await?.is_some() {
                return Err(AppError::duplicate("user", "email", email));
            }
            user.email = email.to_string();
        }

        let user = self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;
        Ok(user)
    }

    /// Uploads the new avatar first, then destroys the old one.
    pub async fn update_avatar(&self, id: &str, upload: Option<Upload>) -> AppResult<User> {
        let upload = required_file("file", upload.as_ref())?;
        let mut user = self.profile(id).await?;

        let media = self.media.upload(upload, MediaKind::Image).await?;
        self.media
            .destroy(&user.avatar.public_id, MediaKind::Image)
            .await?;
        user.avatar = media;

        let user = self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;
        Ok(user)
    }

    pub async fn delete_profile(&self, id: &str) -> AppResult<()> {
        self.remove(id).await
    }

    pub async fn add_to_playlist(&self, user_id: &str, course_id: Option<&str>) -> AppResult<User> {
        let course_id = required("id", course_id)?;
        let mut user = self.profile(user_id).await?;
        let course = self
            .store
            .get_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course", "id", course_id))?;

        if user.has_in_playlist(&course.id) {
            return Err(AppError::duplicate("playlist", "course", course.id));
        }

        user.playlist.push(PlaylistItem {
            course_id: course.id,
            poster: course.poster.url,
        });

        let user = self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;
        Ok(user)
    }

    pub async fn remove_from_playlist(&self, user_id: &str, course_id: Option<&str>) -> AppResult<User> {
        let course_id = required("id", course_id)?;
        let mut user = self.profile(user_id).await?;
        let course = self
            .store
            .get_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course", "id", course_id))?;

        user.playlist.retain(|item| item.course_id != course.id);

        let user = self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;
        Ok(user)
    }

    // ==================== Admin ====================

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.list_users().await
    }

    /// Flips the role between `user` and `admin`.
    pub async fn toggle_role(&self, id: &str) -> AppResult<User> {
        let mut user = self.profile(id).await?;
        user.role = user.role.toggled();

        let user = self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "Changed user role");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.remove(id).await
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        let user = self.profile(id).await?;

        self.media
            .destroy(&user.avatar.public_id, MediaKind::Image)
            .await?;
        self.store.delete_user(&user.id).await?;
        self.notifier.notify_user_changed().await?;

        tracing::info!(user_id = %user.id, "Deleted user");
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
