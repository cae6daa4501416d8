//! HTTP API for prayer entries.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth)
//! - `POST /api/register`, `POST /api/login`: Start a session (no auth)
//! - `POST /api/logout`, `GET /api/user`: Session management (auth)
//! - `GET|POST /api/prayers`: List / create entries (auth)
//! - `PATCH|DELETE /api/prayers/{id}`: Toggle / delete an owned entry (auth)

pub mod config;
pub mod error;
pub mod gate;
pub mod password;
pub mod routes;
pub mod sessions;

pub use config::ServerConfig;
pub use error::ApiError;
pub use gate::AuthUser;
pub use sessions::SessionStore;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::{PrayerRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub prayers: PrayerRepository,
    pub users: UserRepository,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool, sessions: SessionStore) -> Self {
        Self {
            prayers: PrayerRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            sessions: Arc::new(sessions),
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/api/register", post(routes::register))
        .route("/api/login", post(routes::login));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/logout", post(routes::logout))
        .route("/api/user", get(routes::current_user))
        .route(
            "/api/prayers",
            get(routes::list_prayers).post(routes::create_prayer),
        )
        .route(
            "/api/prayers/{id}",
            patch(routes::update_prayer).delete(routes::delete_prayer),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
