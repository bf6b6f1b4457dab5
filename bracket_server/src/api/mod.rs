//! HTTP API for the bracket server.
//!
//! # Modules
//!
//! - [`auth`]: User authentication (register, login, logout, token refresh)
//! - [`tournaments`]: Tournament creation, listing, roster registration and results
//! - [`teams`]: Team creation and membership
//! - [`middleware`]: Authentication middleware for protected endpoints
//! - [`request_id`]: Request correlation and HTTP metrics
//! - [`errors`]: JSON error responses
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                                   - Health check (public)
//! POST /api/v1/auth/register                     - Register + login (public)
//! POST /api/v1/auth/login                        - Login (public)
//! POST /api/v1/auth/refresh                      - Rotate refresh token (public)
//! POST /api/v1/auth/logout                       - Logout (auth required)
//! GET  /api/v1/tournaments                       - List tournaments (public)
//! POST /api/v1/tournaments                       - Create tournament (auth required)
//! GET  /api/v1/tournaments/{id}                  - Tournament detail (public)
//! POST /api/v1/tournaments/{id}/registrations    - Register a team (auth required)
//! POST /api/v1/fixtures/{id}/result              - Report a result (auth required)
//! POST /api/v1/teams                             - Create team (auth required)
//! GET  /api/v1/teams/{id}                        - Team detail (public)
//! POST /api/v1/teams/{id}/members                - Add member (auth required)
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bracket::db::MemoryStore;
//! use bracket_server::api::{AppState, create_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(
//!     Arc::new(MemoryStore::new()),
//!     "pepper_at_least_16".to_string(),
//!     "jwt_secret_that_is_at_least_32_chars".to_string(),
//! );
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod auth;
pub mod errors;
pub mod middleware;
pub mod request_id;
pub mod teams;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use bracket::{
    auth::AuthManager,
    db::{RecordStore, SessionRepository, UserRepository},
    team::TeamManager,
    tournament::{RosterManager, TournamentManager},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub tournament_manager: Arc<TournamentManager>,
    pub roster_manager: Arc<RosterManager>,
    pub team_manager: Arc<TeamManager>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Wire every manager to one store
    pub fn new<S>(store: Arc<S>, password_pepper: String, jwt_secret: String) -> Self
    where
        S: RecordStore + UserRepository + SessionRepository + 'static,
    {
        let auth_manager = AuthManager::new(
            store.clone(),
            store.clone(),
            password_pepper,
            jwt_secret,
        );

        Self {
            auth_manager: Arc::new(auth_manager),
            tournament_manager: Arc::new(TournamentManager::new(store.clone())),
            roster_manager: Arc::new(RosterManager::new(store.clone())),
            team_manager: Arc::new(TeamManager::new(store.clone())),
            store,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/tournaments", get(tournaments::list_tournaments))
        .route("/tournaments/{tournament_id}", get(tournaments::get_tournament))
        .route("/teams/{team_id}", get(teams::get_team));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/tournaments", post(tournaments::create_tournament))
        .route(
            "/tournaments/{tournament_id}/registrations",
            post(tournaments::register_team),
        )
        .route("/fixtures/{fixture_id}/result", post(tournaments::report_result))
        .route("/teams", post(teams::create_team))
        .route("/teams/{team_id}/members", post(teams::add_member))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the record store answers, `503 Service Unavailable` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.store.health_check().await.is_ok();

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
