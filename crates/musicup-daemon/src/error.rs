//! Daemon error taxonomy and exit codes

use musicup_core::{config::ValidationError, identity::IdentityError};
use thiserror::Error;

/// Exit status for a clean, signal-driven shutdown
pub const EXIT_OK: u8 = 0;
/// Exit status when login fails or the daemon cannot keep running
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for unusable configuration (same code clap uses for usage errors)
pub const EXIT_CONFIGURATION: u8 = 2;

/// Errors that stop the daemon
///
/// Per-file upload and filesystem failures are not here: they are logged by
/// the event handler and never end the run.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The configuration is unusable, detected before any upload
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Login was rejected; the watcher was never started
    #[error("Error with oauth credentials")]
    Authentication,

    /// The filesystem watcher could not be started or died
    #[error("Watcher error: {0}")]
    Watcher(String),
}

impl DaemonError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            DaemonError::Configuration(_) => EXIT_CONFIGURATION,
            DaemonError::Authentication | DaemonError::Watcher(_) => EXIT_FAILURE,
        }
    }
}

impl From<IdentityError> for DaemonError {
    fn from(err: IdentityError) -> Self {
        DaemonError::Configuration(format!(
            "no usable default uploader id ({err}); pass --uploader_id"
        ))
    }
}

impl From<Vec<ValidationError>> for DaemonError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        DaemonError::Configuration(joined)
    }
}
