use axum::Json;
use axum::extract::State;
use coursebundler_catalog::{ContactMessage, CourseRequest};
use coursebundler_stats::DashboardStats;
use serde_json::Value;

use super::message;
use crate::extractor::AdminUser;
use crate::{ApiResult, AppState, Envelope};

pub(crate) async fn contact(
    State(state): State<AppState>,
    Json(input): Json<ContactMessage>,
) -> ApiResult<Json<Value>> {
    state.services.contact.contact(input).await?;
    Ok(message("Your request has been sent."))
}

pub(crate) async fn course_request(
    State(state): State<AppState>,
    Json(input): Json<CourseRequest>,
) -> ApiResult<Json<Value>> {
    state.services.contact.course_request(input).await?;
    Ok(message("Your request has been sent."))
}

pub(crate) async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Envelope<DashboardStats>>> {
    let stats = state.dashboard.dashboard().await?;
    Ok(Envelope::ok(stats))
}
