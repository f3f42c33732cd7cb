use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use coursebundler_catalog::{CourseFilter, NewCourse, NewLecture};
use serde::Deserialize;
use serde_json::{Value, json};

use super::message;
use crate::extractor::{AdminUser, Subscriber};
use crate::upload::UploadForm;
use crate::{ApiResult, AppState};

pub(crate) async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> ApiResult<Json<Value>> {
    let courses = state.services.courses.list_courses(&filter).await?;
    Ok(Json(json!({ "success": true, "courses": courses })))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut form = UploadForm::read(multipart).await?;
    let course = state
        .services
        .courses
        .create_course(NewCourse {
            title: form.take("title"),
            description: form.take("description"),
            category: form.take("category"),
            created_by: form.take("createdBy"),
            poster: form.take_file(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Course created successfully",
            "course": course,
        })),
    ))
}

/// Lectures are subscriber-only; every fetch counts as a view.
pub(crate) async fn lectures(
    State(state): State<AppState>,
    _subscriber: Subscriber,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let lectures = state.services.courses.course_lectures(&id).await?;
    Ok(Json(json!({ "success": true, "lectures": lectures })))
}

pub(crate) async fn add_lecture(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut form = UploadForm::read(multipart).await?;
    state
        .services
        .courses
        .add_lecture(
            &id,
            NewLecture {
                title: form.take("title"),
                description: form.take("description"),
                video: form.take_file(),
            },
        )
        .await?;

    Ok(message("Lecture added in the course"))
}

pub(crate) async fn delete_course(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.services.courses.delete_course(&id).await?;
    Ok(message("Course deleted successfully"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LectureQuery {
    course_id: Option<String>,
    lecture_id: Option<String>,
}

pub(crate) async fn delete_lecture(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<LectureQuery>,
) -> ApiResult<Json<Value>> {
    state
        .services
        .courses
        .delete_lecture(query.course_id.as_deref(), query.lecture_id.as_deref())
        .await?;
    Ok(message("Lecture deleted successfully"))
}
