//! HTTP handlers for auth routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use ovenlovin_core::auth::{
    calculate_expiry, generate_session_id, AuthError as CoreError, Session, SessionId,
};
use ovenlovin_core::serde::deserialize_optional_string;
use ovenlovin_core::user::User;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AuthError;
use crate::extractors::CurrentUser;
use crate::password::{hash_password, verify_password};
use crate::AuthState;

/// Request body for POST /auth/signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
}

/// Request body for POST /auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for POST /auth/change-password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Creates the auth router with all authentication routes.
///
/// Routes:
/// - `POST /auth/signup` - Create an account and start a session
/// - `POST /auth/login` - Start a session from email + password
/// - `POST /auth/logout` - End the current session
/// - `POST /auth/logout-all` - End all sessions for the current user
/// - `POST /auth/change-password` - Rotate the current user's password
/// - `GET /auth/me` - Get the current authenticated user
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/logout-all", post(logout_all))
        .route("/auth/change-password", post(change_password))
        .route("/auth/me", get(me))
}

async fn signup(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<User>), AuthError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::Validation("A valid email is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(AuthError::Validation("A password is required".to_string()));
    }

    if state.users.get_user_by_email(&email).await.storage_err()?.is_some() {
        return Err(CoreError::EmailTaken.into());
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| CoreError::Hashing(e.to_string()))?;

    let mut user = User::new(&email, password_hash);
    if let Some(name) = payload.name {
        user = user.with_name(name);
    }

    state.users.create_user(&user).await.storage_err()?;

    tracing::info!(user_id = %user.id, email = %user.email, "Created new account");

    let (jar, _session) = start_session(&state, jar, user.id).await?;
    Ok((StatusCode::CREATED, jar, Json(user)))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<User>), AuthError> {
    let email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password produce the same response.
    let user = state
        .users
        .get_user_by_email(&email)
        .await
        .storage_err()?
        .ok_or(CoreError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash) {
        tracing::warn!(email = %email, "Login failed: invalid password");
        return Err(CoreError::InvalidCredentials.into());
    }

    let (jar, _session) = start_session(&state, jar, user.id).await?;

    tracing::info!(user_id = %user.id, "Login successful");

    Ok((jar, Json(user)))
}

async fn logout(
    State(state): State<AuthState>,
    CurrentUser(_user): CurrentUser,
    jar: CookieJar,
) -> Result<CookieJar, AuthError> {
    // Get session ID from cookie
    if let Some(cookie) = jar.get(&state.config.cookie_name) {
        let session_id = SessionId::new(cookie.value().to_string());
        state.sessions.delete_session(&session_id).await?;
    }

    // Remove cookie
    let jar = jar.remove(Cookie::from(state.config.cookie_name.clone()));
    Ok(jar)
}

async fn logout_all(
    State(state): State<AuthState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<CookieJar, AuthError> {
    state.sessions.delete_user_sessions(user.id).await?;

    // Remove cookie
    let jar = jar.remove(Cookie::from(state.config.cookie_name.clone()));
    Ok(jar)
}

async fn change_password(
    State(state): State<AuthState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    if payload.new_password.is_empty() {
        return Err(AuthError::Validation("A new password is required".to_string()));
    }

    if !verify_password(&payload.current_password, &user.password_hash) {
        return Err(CoreError::InvalidCredentials.into());
    }

    let password_hash =
        hash_password(&payload.new_password).map_err(|e| CoreError::Hashing(e.to_string()))?;

    state
        .users
        .update_user_password(user.id, &password_hash)
        .await
        .storage_err()?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Create a session for the user and attach the session cookie to the jar.
async fn start_session(
    state: &AuthState,
    jar: CookieJar,
    user_id: Uuid,
) -> Result<(CookieJar, Session), AuthError> {
    let now = Utc::now();
    let session = Session {
        id: generate_session_id(),
        user_id,
        created_at: now,
        expires_at: calculate_expiry(
            now,
            Duration::seconds(state.config.session_ttl.as_secs() as i64),
        ),
    };
    state.sessions.create_session(&session).await?;

    let cookie = Cookie::build((state.config.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64
        ))
        .build();

    Ok((jar.add(cookie), session))
}

/// Maps repository errors into auth storage errors.
trait StorageResultExt<T> {
    fn storage_err(self) -> Result<T, AuthError>;
}

impl<T> StorageResultExt<T> for Result<T, ovenlovin_core::storage::RepositoryError> {
    fn storage_err(self) -> Result<T, AuthError> {
        self.map_err(|e| AuthError::Storage(e.to_string()))
    }
}
