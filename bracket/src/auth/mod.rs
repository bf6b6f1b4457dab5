//! Authentication module providing user registration, login, and session management.
//!
//! This module implements authentication with:
//! - Argon2id password hashing with server-side pepper
//! - JWT access tokens (15-minute expiry)
//! - Rotating refresh tokens (7-day expiry)
//!
//! Accounts are identified by email address.
//!
//! ## Example
//!
//! ```no_run
//! use bracket::auth::{AuthManager, RegisterRequest};
//! use bracket::db::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let auth = AuthManager::new(
//!         store.clone(),
//!         store,
//!         "secret_pepper_value".to_string(),
//!         "jwt_secret_at_least_thirty_two_chars".to_string(),
//!     );
//!
//!     let request = RegisterRequest {
//!         email: "captain@example.com".to_string(),
//!         password: "SecurePass123".to_string(),
//!         display_name: "Captain".to_string(),
//!     };
//!
//!     let user = auth.register(request).await?;
//!     println!("Registered user: {}", user.email);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::{AuthManager, normalize_email};
pub use models::{
    AccessTokenClaims, LoginRequest, RegisterRequest, Session, SessionTokens, User,
    UserCredentials, UserId,
};
