//! Access control for the prayer API.
//!
//! Two checks live here: a middleware that turns a bearer session id into an
//! [`AuthUser`] (or a 401), and the per-entry ownership check run before any
//! update or delete.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use super::AppState;
use crate::db::PrayerRepository;
use crate::models::PrayerEntry;

/// Authenticated caller, added to request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub session_id: String,
}

/// Extracts the session id from an `Authorization: Bearer <id>` header.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// A session only counts while its account still exists; sessions left
/// behind by a removed account are destroyed here.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = bearer_token(&request).map(str::to_string) else {
        return ApiError::Unauthenticated.into_response();
    };

    let Some(session) = state.sessions.get(&session_id) else {
        tracing::debug!("Rejected unknown or expired session");
        return ApiError::Unauthenticated.into_response();
    };

    let user = match state.users.get_by_id(session.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("Ending session of removed user {}", session.user_id);
            state.sessions.destroy(&session_id);
            return ApiError::Unauthenticated.into_response();
        }
        Err(e) => return ApiError::from(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        username: user.username,
        session_id,
    });
    next.run(request).await
}

/// Parses an `:id` path segment. Anything non-numeric cannot name an owned
/// entry, so it is reported as not found.
pub fn parse_entry_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFoundOrForbidden)
}

/// Confirms `id` exists and belongs to `user`.
///
/// Absent and foreign entries produce the same error.
pub async fn authorize_entry(
    prayers: &PrayerRepository,
    user: &AuthUser,
    id: i64,
) -> Result<PrayerEntry, ApiError> {
    match prayers.find_owned(id, user.user_id).await? {
        Some(entry) => Ok(entry),
        None => {
            tracing::debug!(
                "User {} denied access to prayer entry {}",
                user.username,
                id
            );
            Err(ApiError::NotFoundOrForbidden)
        }
    }
}
