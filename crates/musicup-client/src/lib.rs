//! music-upload client - HTTP adapter for the remote music library
//!
//! Implements the [`UploadClient`](musicup_core::ports::UploadClient) port
//! over a small JSON/multipart API:
//!
//! - `POST /oauth/refresh` - exchange a refresh token for a new access token
//! - `POST /uploaders` - register this device (login)
//! - `POST /tracks` - upload one audio file
//!
//! ## Modules
//!
//! - [`client`] - the [`MusicManagerClient`](client::MusicManagerClient) adapter
//! - [`credentials`] - loading the OAuth credential file

pub mod client;
pub mod credentials;

use thiserror::Error;

/// Errors that can occur when talking to the music service
///
/// These never leave the adapter: the port reports them as a `false` login
/// or as an [`UploadOutcome::not_uploaded`](musicup_core::domain::UploadOutcome)
/// reason.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The credential file is missing, unreadable, or malformed
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// The service rejected the credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The service answered with an unexpected status code
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
