//! HTTP client for the prayer API.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::error::ClientError;
use crate::models::{Credentials, NewPrayerEntry, PrayerEntry, User};

/// The entry operations the mutation controller drives.
///
/// [`HttpApi`] talks to a real server; tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait PrayerApi {
    async fn list(&self) -> Result<Vec<PrayerEntry>, ClientError>;
    async fn create(&self, entry: &NewPrayerEntry) -> Result<PrayerEntry, ClientError>;
    async fn set_resolved(&self, id: i64, is_resolved: bool) -> Result<PrayerEntry, ClientError>;
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
}

/// Returned by register and login.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// reqwest-backed [`PrayerApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotLoggedIn)?;
        Ok(builder.bearer_auth(token))
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let response = self
            .client
            .post(self.url("/api/register"))
            .json(credentials)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(credentials)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self
            .authed(self.client.post(self.url("/api/logout")))?
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        let response = self
            .authed(self.client.get(self.url("/api/user")))?
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

impl PrayerApi for HttpApi {
    async fn list(&self) -> Result<Vec<PrayerEntry>, ClientError> {
        let response = self
            .authed(self.client.get(self.url("/api/prayers")))?
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, entry: &NewPrayerEntry) -> Result<PrayerEntry, ClientError> {
        let response = self
            .authed(self.client.post(self.url("/api/prayers")))?
            .json(entry)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn set_resolved(&self, id: i64, is_resolved: bool) -> Result<PrayerEntry, ClientError> {
        let response = self
            .authed(self.client.patch(self.url(&format!("/api/prayers/{}", id))))?
            .json(&json!({ "isResolved": is_resolved }))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .authed(self.client.delete(self.url(&format!("/api/prayers/{}", id))))?
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Maps non-success statuses onto [`ClientError`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or(text);

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthenticated,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        _ => ClientError::Status {
            status: status.as_u16(),
            message,
        },
    })
}
