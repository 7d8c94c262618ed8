//! Axum extractors for the authenticated user.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use ovenlovin_core::auth::{is_session_expired, SessionId};
use ovenlovin_core::user::User;

use crate::AuthState;

/// Pulls the session ID out of a request: a Bearer Authorization header
/// first (API clients), then the session cookie (web clients).
fn session_id_from_parts(parts: &Parts, state: &AuthState) -> Option<SessionId> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if let Some(token) = bearer {
        return Some(SessionId::new(token.to_string()));
    }

    CookieJar::from_headers(&parts.headers)
        .get(&state.config.cookie_name)
        .map(|cookie| SessionId::new(cookie.value().to_string()))
}

/// Resolves a session ID to its live user. Expired sessions and sessions
/// whose user no longer exists are unauthorized.
async fn resolve_user(
    state: &AuthState,
    session_id: &SessionId,
) -> Result<User, (StatusCode, &'static str)> {
    let session = state
        .sessions
        .get_session(session_id)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Session lookup failed"))?
        .ok_or((StatusCode::UNAUTHORIZED, "Session not found"))?;

    if is_session_expired(&session, Utc::now()) {
        return Err((StatusCode::UNAUTHORIZED, "Session expired"));
    }

    state
        .users
        .get_user(session.user_id)
        .await
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "User lookup failed"))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found"))
}

/// Extractor for the authenticated user. Returns 401 if not authenticated.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let session_id = session_id_from_parts(parts, &auth_state)
            .ok_or((StatusCode::UNAUTHORIZED, "Not signed in"))?;
        let user = resolve_user(&auth_state, &session_id).await?;
        Ok(CurrentUser(user))
    }
}

/// Extractor for an optionally authenticated user. Yields None whenever the
/// session cannot be resolved, so handlers never reject anonymous callers.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let user = match session_id_from_parts(parts, &auth_state) {
            Some(session_id) => resolve_user(&auth_state, &session_id).await.ok(),
            None => None,
        };
        Ok(OptionalUser(user))
    }
}
