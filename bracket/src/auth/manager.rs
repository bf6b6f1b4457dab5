//! Authentication manager implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{AccessTokenClaims, LoginRequest, RegisterRequest, SessionTokens, User},
};
use crate::db::{SessionRepository, UserRepository};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_DISPLAY_NAME_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 254;

/// Canonical form of an email address used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    pepper: String,
    jwt_secret: String,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `users` - User account storage
    /// * `sessions` - Refresh-token storage
    /// * `pepper` - Server-side pepper for password hashing
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        pepper: String,
        jwt_secret: String,
    ) -> Self {
        Self {
            users,
            sessions,
            pepper,
            jwt_secret,
            access_token_duration: Duration::minutes(15),
            refresh_token_duration: Duration::days(7),
        }
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidEmail` - Email is not shaped like an address
    /// * `AuthError::InvalidDisplayName` - Display name empty or too long
    /// * `AuthError::WeakPassword` - Password too short
    /// * `AuthError::EmailTaken` - Email already registered
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        let display_name = request.display_name.trim();
        validate_display_name(display_name)?;
        validate_password(&request.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = match self
            .users
            .create_user(&email, &password_hash, display_name)
            .await
        {
            Ok(user) => user,
            Err(e) if e.is_unique_violation() => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        };

        log::info!("Registered user {} <{}>", user.id, user.email);
        Ok(user)
    }

    /// Login a user
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password
    pub async fn login(&self, request: LoginRequest) -> AuthResult<(User, SessionTokens)> {
        let email = normalize_email(&request.email);
        let credentials = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        self.verify_password(&request.password, &credentials.password_hash)?;

        let user = credentials.user;
        self.users.update_last_login(user.id).await?;

        let tokens = self.create_session(&user).await?;
        log::debug!("User {} logged in", user.id);

        Ok((user, tokens))
    }

    /// Create a new session with access and refresh tokens
    async fn create_session(&self, user: &User) -> AuthResult<SessionTokens> {
        let access_token = self.generate_access_token(user)?;
        let refresh_token = Uuid::new_v4().to_string();

        let expires_at = Utc::now() + self.refresh_token_duration;
        self.sessions
            .create_session(user.id, &refresh_token, expires_at)
            .await?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new token pair; the old refresh token is revoked
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidRefreshToken` - Refresh token not found
    /// * `AuthError::SessionExpired` - Refresh token expired
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<SessionTokens> {
        let session = self
            .sessions
            .find_session(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if session.expires_at < Utc::now() {
            self.sessions.delete_session(refresh_token).await?;
            return Err(AuthError::SessionExpired);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        // Rotation: a refresh token is single-use
        if !self.sessions.delete_session(refresh_token).await? {
            return Err(AuthError::InvalidRefreshToken);
        }

        self.create_session(&user).await
    }

    /// Logout user by invalidating refresh token
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        self.sessions.delete_session(refresh_token).await?;
        Ok(())
    }

    /// Verify an access token
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default()
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    fn generate_access_token(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user.id,
            display_name: user.display_name.clone(),
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?)
    }
}

fn validate_email(email: &str) -> AuthResult<()> {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidEmail(
            "Email must be a single address".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail("Email must contain '@'".to_string()));
    };

    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(AuthError::InvalidEmail(format!("{email:?} is not an address")));
    }

    Ok(())
}

fn validate_display_name(display_name: &str) -> AuthResult<()> {
    let len = display_name.chars().count();
    if len == 0 || len > MAX_DISPLAY_NAME_LEN {
        return Err(AuthError::InvalidDisplayName(format!(
            "Display name must be 1-{MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> AuthResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
