//! Account extractors for Axum handlers.
//!
//! All three read the [`User`] attached by
//! [`IdentityLayer`](crate::IdentityLayer) and reject with the matching
//! [`ApiError`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use coursebundler_core::error::AppError;
use coursebundler_core::types::User;

use crate::ApiError;

/// Any signed-in account. Rejects with 401 otherwise.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> String {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError(AppError::Unauthenticated))
    }
}

/// A signed-in account with the admin role. Rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError(AppError::Forbidden(format!(
                "{} is not allowed to access this resource",
                user.role.as_str()
            ))));
        }
        Ok(AdminUser(user))
    }
}

/// A signed-in account with an active subscription, or an admin.
#[derive(Debug, Clone)]
pub struct Subscriber(pub User);

impl<S> FromRequestParts<S> for Subscriber
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.has_active_subscription() && !user.is_admin() {
            return Err(ApiError(AppError::Forbidden(
                "Only subscribers can access this resource".to_string(),
            )));
        }
        Ok(Subscriber(user))
    }
}
