//! Authentication middleware for protected endpoints.
//!
//! Validates the `Authorization: Bearer <token>` header and injects the
//! caller's [`RequestContext`] into request extensions for downstream handlers.
//!
//! # Extracting the context
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use bracket::RequestContext;
//!
//! async fn protected_handler(Extension(ctx): Extension<RequestContext>) -> String {
//!     format!("Authenticated as user {}", ctx.user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use bracket::RequestContext;

use super::{AppState, errors::ApiError};
use crate::logging;

/// Pull the bearer token out of an `Authorization` header value
fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT tokens and injects the request context.
///
/// - **Success**: Token valid → `RequestContext` in extensions → next handler
/// - **Missing or malformed header**: `401 Unauthorized`
/// - **Invalid/expired token**: `401 Unauthorized`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(ApiError::unauthorized)?;

    match state.auth_manager.verify_access_token(token) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(RequestContext::new(claims.sub));
            Ok(next.run(request).await)
        }
        Err(e) => {
            logging::log_security_event("invalid_access_token", None, &e.to_string());
            Err(ApiError::unauthorized())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
    }
}
