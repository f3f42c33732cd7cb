//! Identity middleware layer for Axum.
//!
//! Session issuance happens outside this service; the gateway in front of
//! it forwards the authenticated account id in the `x-user-id` header. The
//! layer resolves that id through the store and attaches the [`User`] to
//! the request extensions, where the extractors pick it up.

use axum::body::Body;
use axum::http::{Request, Response};
use coursebundler_core::traits::CatalogStore;
use coursebundler_core::types::User;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Header carrying the authenticated account id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Layer that resolves the caller's account.
#[derive(Clone)]
pub struct IdentityLayer {
    store: Arc<dyn CatalogStore>,
}

impl IdentityLayer {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IdentityMiddleware {
            inner,
            store: self.store.clone(),
        }
    }
}

/// Middleware service produced by [`IdentityLayer`].
#[derive(Clone)]
pub struct IdentityMiddleware<S> {
    inner: S,
    store: Arc<dyn CatalogStore>,
}

impl<S> Service<Request<Body>> for IdentityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let store = self.store.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if let Some(user_id) = extract_user_id(&req) {
                match store.get_user_by_id(&user_id).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert::<User>(user);
                    }
                    Ok(None) => tracing::debug!(user_id, "Unknown user id on request"),
                    Err(e) => tracing::warn!(user_id, "Identity lookup failed: {}", e),
                }
            }

            inner.call(req).await
        })
    }
}

/// Reads a non-empty user id from the identity header.
fn extract_user_id(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_user_id() {
        let req = Request::builder()
            .header(USER_ID_HEADER, " user-123 ")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_user_id(&req), Some("user-123".to_string()));
    }

    #[test]
    fn test_blank_header_ignored() {
        let req = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(Body::empty())
            .unwrap();

        assert!(extract_user_id(&req).is_none());
    }

    #[test]
    fn test_no_header() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert!(extract_user_id(&req).is_none());
    }
}
