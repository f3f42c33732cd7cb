//! Route mounting for the CourseBundler API.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};

use crate::handlers::{courses, other, payments, users};
use crate::layer::IdentityLayer;
use crate::upload::MAX_UPLOAD_BYTES;
use crate::AppState;

/// Mount point of every route.
pub const API_PREFIX: &str = "/api/v1";

/// Creates an Axum router with every API route mounted under [`API_PREFIX`].
///
/// # Example
///
/// ```rust,ignore
/// let app = api_router(state);
/// ```
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        // Courses
        .route("/courses", get(courses::list))
        .route("/createcourse", post(courses::create))
        .route(
            "/course/{id}",
            get(courses::lectures)
                .post(courses::add_lecture)
                .delete(courses::delete_course),
        )
        .route("/lecture", delete(courses::delete_lecture))
        // Users
        .route("/register", post(users::register))
        .route("/me", get(users::me).delete(users::delete_me))
        .route("/updateprofile", put(users::update_profile))
        .route("/updateprofilepicture", put(users::update_picture))
        .route("/addtoplaylist", post(users::add_to_playlist))
        .route("/removefromplaylist", delete(users::remove_from_playlist))
        // Admin
        .route("/admin/users", get(users::list))
        .route(
            "/admin/users/{id}",
            put(users::toggle_role).delete(users::delete_user),
        )
        .route("/admin/stats", get(other::dashboard))
        // Payments
        .route("/subscribe", get(payments::buy))
        .route("/paymentverification", post(payments::verify))
        .route("/subscribe/cancel", delete(payments::cancel))
        .route("/razorpaykey", get(payments::key))
        // Contact
        .route("/contact", post(other::contact))
        .route("/courserequest", post(other::course_request));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(IdentityLayer::new(state.store.clone()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
