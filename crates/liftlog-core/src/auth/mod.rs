//! Auth client for the workout API.
//!
//! Sessions are persisted through a pluggable store so a restart can resume
//! without a fresh sign-in. Tokens never appear in Debug output or logs.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{is_http_url, unix_timestamp_now};

const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Session storage error: {0}")]
    SessionStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Where sessions live between runs.
pub trait SessionStore: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

/// Token source for the sync engine.
///
/// Futures are `Send` so the engine can run inside spawned tasks.
pub trait AuthProvider: Send + Sync + 'static {
    /// Current access token, refreshing first if the session is expired.
    fn access_token(&self) -> impl Future<Output = AuthResult<String>> + Send;

    /// Force a refresh and return the new access token. Used after the API
    /// rejects a token that looked valid locally.
    fn refresh_access_token(&self) -> impl Future<Output = AuthResult<String>> + Send;
}

/// JSON-file session store under the app's data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AuthError::SessionStorage(error.to_string())),
        }
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| AuthError::SessionStorage(error.to_string()))?;
        }
        let contents = serde_json::to_string(session)?;
        std::fs::write(&self.path, contents)
            .map_err(|error| AuthError::SessionStorage(error.to_string()))
    }

    fn clear_session(&self) -> AuthResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AuthError::SessionStorage(error.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct AuthClient<S: SessionStore> {
    auth_url: String,
    client: Client,
    store: S,
}

impl<S: SessionStore> AuthClient<S> {
    pub fn new(base_url: impl AsRef<str>, store: S) -> AuthResult<Self> {
        let auth_url = normalize_auth_url(base_url.as_ref())?;
        Ok(Self {
            auth_url,
            client: Client::builder().build()?,
            store,
        })
    }

    /// Load the persisted session, refreshing it if it has expired. Returns
    /// `None` (and clears the store) when the refresh token is no longer
    /// accepted.
    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        match self.refresh_session(&stored_session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/login", self.auth_url))
            .json(&payload)
            .send()
            .await?;
        let session = parse_session_response(response).await?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "refresh token must not be empty",
            ));
        }

        let payload = serde_json::json!({
            "refresh_token": refresh_token,
        });
        let response = self
            .client
            .post(format!("{}/refresh", self.auth_url))
            .json(&payload)
            .send()
            .await?;
        let session = parse_session_response(response).await?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        if let Some(session) = self.store.load_session()? {
            let response = self
                .client
                .post(format!("{}/logout", self.auth_url))
                .bearer_auth(&session.access_token)
                .send()
                .await?;
            // A rejected token still means the session is over locally.
            if !(response.status().is_success()
                || response.status() == StatusCode::UNAUTHORIZED)
            {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AuthError::Api(parse_api_error(status, &body)));
            }
        }

        self.store.clear_session()
    }

    pub fn current_session(&self) -> AuthResult<Option<AuthSession>> {
        self.store.load_session()
    }
}

impl<S: SessionStore> AuthProvider for AuthClient<S> {
    async fn access_token(&self) -> AuthResult<String> {
        let session = self
            .restore_session()
            .await?
            .ok_or(AuthError::NotSignedIn)?;
        Ok(session.access_token)
    }

    async fn refresh_access_token(&self) -> AuthResult<String> {
        let session = self.store.load_session()?.ok_or(AuthError::NotSignedIn)?;
        let refreshed = self.refresh_session(&session.refresh_token).await?;
        Ok(refreshed.access_token)
    }
}

fn normalize_auth_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "API base URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(AuthError::InvalidConfiguration(
            "API base URL must include http:// or https://",
        ));
    }
    Ok(format!("{trimmed}/api/auth"))
}

fn validate_credentials(email: &str, password: &str) -> AuthResult<()> {
    if email.trim().is_empty() {
        return Err(AuthError::Api("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(AuthError::Api("Password is required".to_string()));
    }
    Ok(())
}

async fn parse_session_response(response: reqwest::Response) -> AuthResult<AuthSession> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Api(parse_api_error(status, &body)));
    }
    let payload = response.json::<AuthSessionResponse>().await?;
    payload.into_session()
}

#[derive(Debug, Deserialize)]
struct AuthSessionResponse {
    access_token: String,
    refresh_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: AuthUser,
}

impl AuthSessionResponse {
    fn into_session(self) -> AuthResult<AuthSession> {
        let expires_at = self
            .expires_at
            .or_else(|| {
                self.expires_in
                    .map(|expires_in| unix_timestamp_now().saturating_add(expires_in))
            })
            .ok_or_else(|| {
                AuthError::Api("Auth response did not include expires_at/expires_in".to_string())
            })?;

        Ok(AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    message: Option<String>,
    #[serde(rename = "statusMessage")]
    status_message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<AuthErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.status_message).or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
