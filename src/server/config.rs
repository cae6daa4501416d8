use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// How long a login session stays valid
    pub session_ttl_minutes: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PRAYERTRACK_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database_path = lookup("PRAYERTRACK_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_database_path);

        let session_ttl_minutes = lookup("PRAYERTRACK_SESSION_TTL_MINUTES")
            .and_then(|m| m.parse().ok())
            .unwrap_or(7 * 24 * 60);

        Self {
            port,
            database_path,
            session_ttl_minutes,
        }
    }

    /// Default database path: <data_dir>/prayertrack-server/prayertrack.db
    pub fn default_database_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prayertrack-server")
            .join("prayertrack.db")
    }
}
