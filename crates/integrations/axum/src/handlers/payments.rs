use axum::Json;
use axum::extract::State;
use coursebundler_catalog::PaymentVerification;
use serde_json::{Value, json};

use super::message;
use crate::extractor::{CurrentUser, Subscriber};
use crate::{ApiResult, AppState};

pub(crate) async fn buy(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Value>> {
    let subscription = state.services.subscriptions.buy(&user.id).await?;
    Ok(Json(json!({ "success": true, "subscriptionId": subscription.id })))
}

/// Checkout callback. The body names the browser redirect target.
pub(crate) async fn verify(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(callback): Json<PaymentVerification>,
) -> ApiResult<Json<Value>> {
    let payment = state
        .services
        .subscriptions
        .verify_payment(&user.id, callback)
        .await?;

    let redirect = format!(
        "{}/paymentsuccess?reference={}",
        state.frontend_url.trim_end_matches('/'),
        payment.payment_id
    );
    Ok(Json(json!({
        "success": true,
        "message": "Payment verified",
        "reference": payment.payment_id,
        "redirect": redirect,
    })))
}

pub(crate) async fn cancel(
    State(state): State<AppState>,
    Subscriber(user): Subscriber,
) -> ApiResult<Json<Value>> {
    state.services.subscriptions.cancel(&user.id).await?;
    Ok(message("Subscription cancelled"))
}

pub(crate) async fn key(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "success": true, "key": state.services.subscriptions.public_key() }))
}
