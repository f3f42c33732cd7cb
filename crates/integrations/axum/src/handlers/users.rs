use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use coursebundler_catalog::{ProfileUpdate, RegisterInput};
use serde::Deserialize;
use serde_json::{Value, json};

use super::message;
use crate::extractor::{AdminUser, CurrentUser};
use crate::upload::UploadForm;
use crate::{ApiResult, AppState};

pub(crate) async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut form = UploadForm::read(multipart).await?;
    let user = state
        .services
        .users
        .register(RegisterInput {
            name: form.take("name"),
            email: form.take("email"),
            avatar: form.take_file(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Registered successfully",
            "user": user,
        })),
    ))
}

pub(crate) async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "success": true, "user": user }))
}

pub(crate) async fn delete_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    state.services.users.delete_profile(&user.id).await?;
    Ok(message("Profile deleted successfully"))
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<Value>> {
    state.services.users.update_profile(&user.id, update).await?;
    Ok(message("Profile updated successfully"))
}

pub(crate) async fn update_picture(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut form = UploadForm::read(multipart).await?;
    state
        .services
        .users
        .update_avatar(&user.id, form.take_file())
        .await?;
    Ok(message("Profile picture updated successfully"))
}

/// Playlist target, as a JSON body or `?id=`.
#[derive(Debug, Deserialize)]
pub(crate) struct CourseRef {
    id: Option<String>,
}

pub(crate) async fn add_to_playlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(target): Json<CourseRef>,
) -> ApiResult<Json<Value>> {
    state
        .services
        .users
        .add_to_playlist(&user.id, target.id.as_deref())
        .await?;
    Ok(message("Course added in playlist successfully"))
}

pub(crate) async fn remove_from_playlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(target): Query<CourseRef>,
) -> ApiResult<Json<Value>> {
    state
        .services
        .users
        .remove_from_playlist(&user.id, target.id.as_deref())
        .await?;
    Ok(message("Course removed from playlist successfully"))
}

// ==================== Admin ====================

pub(crate) async fn list(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Value>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

pub(crate) async fn toggle_role(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.services.users.toggle_role(&id).await?;
    Ok(message("Role updated successfully"))
}

pub(crate) async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.services.users.delete_user(&id).await?;
    Ok(message("User deleted successfully"))
}
