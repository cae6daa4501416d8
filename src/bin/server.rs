//! Prayer Tracker API Server
//!
//! Serves the prayer-entry HTTP API backed by SQLite.
//!
//! # Configuration
//!
//! Environment variables:
//! - `PRAYERTRACK_PORT`: Port to listen on (default: 8080)
//! - `PRAYERTRACK_DATABASE_PATH`: SQLite file (default: ~/.local/share/prayertrack-server/prayertrack.db)
//! - `PRAYERTRACK_SESSION_TTL_MINUTES`: Session lifetime (default: 10080, one week)
//! - `RUST_LOG`: Log filter (default: prayertrack_server=info,prayertrack=info,tower_http=info)

use prayertrack::db::init_db;
use prayertrack::server::{router, AppState, ServerConfig, SessionStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "prayertrack_server=info,prayertrack=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();

    tracing::info!("Database: {}", config.database_path.display());
    let pool = init_db(&config.database_path).await?;

    let state = AppState::new(pool, SessionStore::new(config.session_ttl_minutes));
    spawn_session_sweeper(Arc::clone(&state.sessions));

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_session_sweeper(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired();
            if removed > 0 {
                tracing::debug!("Removed {} expired session(s)", removed);
            }
        }
    });
}
