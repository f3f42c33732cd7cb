//! # CourseBundler Axum Integration
//!
//! This crate exposes the CourseBundler services over HTTP:
//! - Route mounting under `/api/v1`
//! - Identity middleware resolving the `x-user-id` header
//! - Account extractors (`CurrentUser`, `AdminUser`, `Subscriber`)
//! - Error to response mapping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coursebundler_axum::{AppState, api_router};
//!
//! let app = api_router(AppState::new(services, dashboard, store));
//! axum::serve(listener, app).await?;
//! ```

mod extractor;
mod handlers;
mod layer;
mod routes;
mod upload;

pub use extractor::{AdminUser, CurrentUser, Subscriber};
pub use layer::{IdentityLayer, USER_ID_HEADER};
pub use routes::{API_PREFIX, api_router};
pub use upload::{FILE_FIELD, MAX_UPLOAD_BYTES, UploadForm};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coursebundler_catalog::CatalogServices;
use coursebundler_core::error::AppError;
use coursebundler_core::traits::CatalogStore;
use coursebundler_stats::DashboardAggregator;
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the API routes.
#[derive(Clone)]
pub struct AppState {
    pub services: CatalogServices,
    pub dashboard: DashboardAggregator,
    /// Used by the identity layer to resolve callers.
    pub store: Arc<dyn CatalogStore>,
    /// Where the checkout flow sends the browser after payment.
    pub frontend_url: String,
}

impl AppState {
    pub fn new(services: CatalogServices, dashboard: DashboardAggregator, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            services,
            dashboard,
            store,
            frontend_url: String::new(),
        }
    }

    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self
    }
}

/// Wrapper for AppError that implements IntoResponse.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = serde_json::json!({
            "success": false,
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

/// Success body: `{"success": true, ...fields}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(body: T) -> Json<Self> {
        Json(Self { success: true, body })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
