//! OAuth credential file
//!
//! The credential file is a JSON document written by whatever tool performed
//! the interactive OAuth consent:
//!
//! ```json
//! {
//!   "access_token": "ya29...",
//!   "refresh_token": "1//0g...",
//!   "expires_at": "2026-01-01T00:00:00Z"
//! }
//! ```
//!
//! Only `access_token` is required.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ClientError;

/// OAuth tokens read from the credential file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
    /// Bearer token for API requests
    pub access_token: String,
    /// Token for obtaining a new access token without user interaction
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token expires; `None` means it does not expire
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthCredentials {
    /// Reads and parses the credential file at `path`
    ///
    /// # Errors
    /// Returns [`ClientError::Credentials`] if the file cannot be read, is
    /// not valid JSON, or carries an empty access token
    pub async fn load(path: &Path) -> Result<Self, ClientError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ClientError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;

        Self::parse(&content)
    }

    /// Parses credential JSON
    ///
    /// # Errors
    /// Returns [`ClientError::Credentials`] on malformed JSON or an empty access token
    pub fn parse(content: &str) -> Result<Self, ClientError> {
        let credentials: Self = serde_json::from_str(content)
            .map_err(|e| ClientError::Credentials(format!("malformed credential file: {e}")))?;

        if credentials.access_token.trim().is_empty() {
            return Err(ClientError::Credentials("access_token is empty".into()));
        }

        Ok(credentials)
    }

    /// Returns true if the access token has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Returns true if the token can be refreshed
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}
