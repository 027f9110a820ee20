//! Music library HTTP client
//!
//! [`MusicManagerClient`] implements the [`UploadClient`] port with
//! `reqwest`. It holds no retry logic: every call is one request, and every
//! failure is folded into the port's `bool` / [`UploadOutcome`] results.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use musicup_client::client::MusicManagerClient;
//! use musicup_core::{config::ServiceConfig, domain::UploaderId, ports::UploadClient};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut client = MusicManagerClient::new(&ServiceConfig::default())?;
//! let id = UploaderId::new("00:1A:2B:3C:4D:5E")?;
//! if client.login(Path::new("/home/me/oauth"), &id).await {
//!     let outcome = client.upload(Path::new("/home/me/Music/a.mp3"), true).await;
//!     println!("{:?}", outcome.status());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use musicup_core::{
    config::ServiceConfig,
    domain::{UploadOutcome, UploaderId},
    ports::UploadClient,
};
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{credentials::OAuthCredentials, ClientError};

// ============================================================================
// Wire types
// ============================================================================

/// Body of `POST /uploaders`
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    uploader_id: &'a str,
    uploader_name: &'a str,
}

/// Body of `POST /oauth/refresh`
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Response from `POST /oauth/refresh`
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// Server-side classification of an uploaded track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TrackStatus {
    Uploaded,
    Matched,
    Rejected,
}

/// Response from `POST /tracks`
#[derive(Debug, Deserialize)]
struct TrackResponse {
    status: TrackStatus,
    #[serde(default)]
    reason: Option<String>,
}

impl From<TrackResponse> for UploadOutcome {
    fn from(response: TrackResponse) -> Self {
        match response.status {
            TrackStatus::Uploaded => UploadOutcome::uploaded(),
            TrackStatus::Matched => UploadOutcome::matched(),
            TrackStatus::Rejected => UploadOutcome::not_uploaded(
                response
                    .reason
                    .unwrap_or_else(|| "rejected by service".to_string()),
            ),
        }
    }
}

// ============================================================================
// MusicManagerClient
// ============================================================================

/// Authenticated state established by a successful login
///
/// The credentials sit behind a `tokio::sync::Mutex` so an upload, which
/// only has `&self`, can swap in a refreshed access token.
#[derive(Debug)]
struct Session {
    credentials: Mutex<OAuthCredentials>,
    uploader_id: UploaderId,
}

/// HTTP client for the music library upload API
pub struct MusicManagerClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests, without trailing slash
    base_url: String,
    /// Device name sent at registration
    uploader_name: String,
    /// Set by a successful [`UploadClient::login`]
    session: Option<Session>,
}

impl MusicManagerClient {
    /// Creates a client from the service section of the configuration
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            uploader_name: config.uploader_name.clone(),
            session: None,
        })
    }

    /// Creates a client with a custom base URL and default settings (useful for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            uploader_name: ServiceConfig::default().uploader_name,
            session: None,
        }
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true once [`UploadClient::login`] has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Creates a request builder for the given method and API path
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Exchanges the refresh token for a new access token
    async fn refresh(&self, credentials: &OAuthCredentials) -> Result<OAuthCredentials, ClientError> {
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or_else(|| ClientError::Credentials("no refresh token".into()))?;

        debug!("Refreshing expired access token");

        let response = self
            .request(Method::POST, "/oauth/refresh")
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let response = check_status(response).await?;

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("refresh response: {e}")))?;

        Ok(OAuthCredentials {
            access_token: refreshed.access_token,
            refresh_token: credentials.refresh_token.clone(),
            expires_at: refreshed.expires_at,
        })
    }

    /// Loads credentials, refreshing them if needed, and registers the device
    async fn authenticate(
        &self,
        credentials_path: &Path,
        uploader_id: &UploaderId,
    ) -> Result<Session, ClientError> {
        let mut credentials = OAuthCredentials::load(credentials_path).await?;
        self.ensure_fresh(&mut credentials).await?;

        let response = self
            .request(Method::POST, "/uploaders")
            .bearer_auth(&credentials.access_token)
            .json(&RegisterRequest {
                uploader_id: uploader_id.as_str(),
                uploader_name: &self.uploader_name,
            })
            .send()
            .await?;
        check_status(response).await?;

        Ok(Session {
            credentials: Mutex::new(credentials),
            uploader_id: uploader_id.clone(),
        })
    }

    /// Replaces an expired access token with a refreshed one
    async fn ensure_fresh(&self, credentials: &mut OAuthCredentials) -> Result<(), ClientError> {
        if !credentials.is_expired() {
            return Ok(());
        }
        if !credentials.can_refresh() {
            return Err(ClientError::Credentials(
                "access token expired and no refresh token available".into(),
            ));
        }
        *credentials = self.refresh(credentials).await?;
        Ok(())
    }

    /// Current access token of `session`, refreshed first if it has expired
    async fn access_token(&self, session: &Session) -> Result<String, ClientError> {
        let mut credentials = session.credentials.lock().await;
        self.ensure_fresh(&mut credentials).await?;
        Ok(credentials.access_token.clone())
    }

    /// Sends one file to `POST /tracks`
    async fn send_track(
        &self,
        session: &Session,
        path: &Path,
        transcode: bool,
    ) -> Result<UploadOutcome, ClientError> {
        let access_token = self.access_token(session).await?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "track".to_string());

        debug!(path = %path.display(), bytes = bytes.len(), "Sending track");

        let form = multipart::Form::new()
            .text("uploader_id", session.uploader_id.to_string())
            .text("transcode", transcode.to_string())
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .request(Method::POST, "/tracks")
            .bearer_auth(&access_token)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let track: TrackResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("track response: {e}")))?;

        Ok(track.into())
    }
}

/// Maps non-success responses onto [`ClientError`]
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized(
            if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        )),
        _ => Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        }),
    }
}

#[async_trait::async_trait]
impl UploadClient for MusicManagerClient {
    async fn login(&mut self, credentials: &Path, uploader_id: &UploaderId) -> bool {
        match self.authenticate(credentials, uploader_id).await {
            Ok(session) => {
                info!(%uploader_id, "Authenticated with music service");
                self.session = Some(session);
                true
            }
            Err(err) => {
                warn!(
                    credentials = %credentials.display(),
                    error = %err,
                    "Login failed"
                );
                self.session = None;
                false
            }
        }
    }

    async fn upload(&self, path: &Path, transcode: bool) -> UploadOutcome {
        let Some(session) = &self.session else {
            return UploadOutcome::not_uploaded("not authenticated");
        };

        match self.send_track(session, path, transcode).await {
            Ok(outcome) => outcome,
            Err(err) => UploadOutcome::not_uploaded(err.to_string()),
        }
    }
}
