//! Client error types.

/// Errors that can occur while talking to the prayer API.
#[derive(Debug)]
pub enum ClientError {
    /// No session token configured
    NotLoggedIn,
    /// Server rejected the session (401)
    Unauthenticated,
    /// Server rejected the input (400), or local validation failed
    Validation(String),
    /// Entry absent or not owned by the caller (404)
    NotFound,
    /// Toggle requested for an id that is not in the local cache
    UnknownEntry(i64),
    /// Any other non-success status
    Status { status: u16, message: String },
    /// Connection or decoding failure
    HttpError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::NotLoggedIn => {
                write!(f, "Not logged in. Run `prayertrack account login` first.")
            }
            ClientError::Unauthenticated => {
                write!(f, "Session expired or invalid. Log in again.")
            }
            ClientError::Validation(e) => write!(f, "Invalid input: {}", e),
            ClientError::NotFound => write!(f, "Prayer entry not found or access denied"),
            ClientError::UnknownEntry(id) => write!(f, "Prayer #{} not found", id),
            ClientError::Status { status, message } => {
                write!(f, "Server returned status {}: {}", status, message)
            }
            ClientError::HttpError(e) => write!(f, "HTTP error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::HttpError(e.to_string())
    }
}

impl From<crate::models::ValidationError> for ClientError {
    fn from(e: crate::models::ValidationError) -> Self {
        ClientError::Validation(e.0)
    }
}
