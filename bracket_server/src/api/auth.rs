//! Authentication API handlers.
//!
//! - User registration by email, display name and password
//! - Login with email/password
//! - Logout to invalidate refresh tokens
//! - Token refresh for obtaining new access tokens
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "cap@example.com", "password": "long enough", "display_name": "Cap"}'
//! ```

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use bracket::auth::{AuthError, LoginRequest, RegisterRequest, SessionTokens, User};
use serde::{Deserialize, Serialize};

use super::{AppState, errors::ApiError};
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct RefreshPayload {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: i64,
    pub display_name: String,
}

impl AuthResponse {
    fn new(user: &User, tokens: SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user_id: user.id,
            display_name: user.display_name.clone(),
        }
    }
}

/// Register a new user account and automatically log them in.
///
/// # Response
///
/// `201 Created` with an [`AuthResponse`].
///
/// # Errors
///
/// - `400 Bad Request`: malformed email, empty display name, short password
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;
    let password = request.password.clone();

    let user = state.auth_manager.register(request).await?;

    let (user, tokens) = state
        .auth_manager
        .login(LoginRequest {
            email: user.email,
            password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(&user, tokens))))
}

/// Authenticate a user and generate session tokens.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;

    match state.auth_manager.login(request).await {
        Ok((user, tokens)) => {
            metrics::login_attempts_total(true);
            Ok(Json(AuthResponse::new(&user, tokens)))
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            if matches!(e, AuthError::InvalidCredentials) {
                logging::log_security_event("failed_login", None, "Invalid credentials");
            }
            Err(e.into())
        }
    }
}

/// Logout and invalidate the given refresh token.
///
/// The access token keeps working until it expires (15 minutes).
pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<RefreshPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    state.auth_manager.logout(&payload.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Exchange a refresh token for a new access/refresh token pair.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown, expired or already rotated refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshPayload>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(payload) = payload?;
    let tokens = state
        .auth_manager
        .refresh_token(&payload.refresh_token)
        .await?;
    let claims = state
        .auth_manager
        .verify_access_token(&tokens.access_token)?;

    Ok(Json(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        user_id: claims.sub,
        display_name: claims.display_name,
    }))
}
