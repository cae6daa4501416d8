//! HTTP handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use super::gate::{authorize_entry, parse_entry_id, AuthUser};
use super::password::{hash_password, verify_password};
use super::AppState;
use crate::models::{parse_resolution, Credentials, NewPrayerEntry, PrayerEntry, User};

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::Validation(e.body_text()))
}

// ============================================================================
// Prayer entries
// ============================================================================

/// `GET /api/prayers`
pub async fn list_prayers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PrayerEntry>>, ApiError> {
    let entries = state.prayers.list(user.user_id).await?;
    Ok(Json(entries))
}

/// `POST /api/prayers`
pub async fn create_prayer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PrayerEntry>), ApiError> {
    let new_entry = NewPrayerEntry::from_json(json_body(payload)?)?;

    let entry = state.prayers.create(user.user_id, &new_entry).await?;
    tracing::info!("User {} created prayer entry {}", user.user_id, entry.id);

    Ok((StatusCode::CREATED, Json(entry)))
}

/// `PATCH /api/prayers/{id}`
pub async fn update_prayer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PrayerEntry>, ApiError> {
    let is_resolved = parse_resolution(&json_body(payload)?)?;
    let id = parse_entry_id(&id)?;

    authorize_entry(&state.prayers, &user, id).await?;

    // The row can vanish between the ownership check and the write if a
    // delete lands in between.
    let entry = state
        .prayers
        .update(id, is_resolved)
        .await?
        .ok_or(ApiError::NotFoundOrForbidden)?;

    Ok(Json(entry))
}

/// `DELETE /api/prayers/{id}`
pub async fn delete_prayer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_entry_id(&id)?;

    authorize_entry(&state.prayers, &user, id).await?;
    state.prayers.delete(id).await?;
    tracing::info!("User {} deleted prayer entry {}", user.user_id, id);

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Accounts
// ============================================================================

/// Returned by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

fn parse_credentials(body: Value) -> Result<Credentials, ApiError> {
    let credentials: Credentials =
        serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;

    let username = credentials.username.trim().to_string();
    if username.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".to_string(),
        ));
    }

    Ok(Credentials {
        username,
        password: credentials.password,
    })
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let credentials = parse_credentials(json_body(payload)?)?;

    if state
        .users
        .get_by_username(&credentials.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let user = state
        .users
        .create(&credentials.username, &hash_password(&credentials.password))
        .await
        .map_err(|e| {
            let taken = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if taken {
                ApiError::Conflict("Username already exists".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    let token = state.sessions.create(user.id);

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credentials = parse_credentials(json_body(payload)?)?;

    let user = match state.users.get_by_username(&credentials.username).await? {
        Some(user) if verify_password(&credentials.password, &user.password) => user,
        _ => {
            tracing::warn!("Failed login for {}", credentials.username);
            return Err(ApiError::Unauthenticated);
        }
    };

    let token = state.sessions.create(user.id);
    Ok(Json(AuthResponse { user, token }))
}

/// `POST /api/logout`
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> StatusCode {
    state.sessions.destroy(&user.session_id);
    StatusCode::NO_CONTENT
}

/// `GET /api/user`
pub async fn current_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    // The account may have been removed since the session started.
    state
        .users
        .get_by_id(user.user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::Unauthenticated)
}

// ============================================================================
// Health
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
