//! Daemon lifecycle
//!
//! Startup order is fixed: authenticate, upload what is already there, then
//! watch for new files until the shutdown token is cancelled.

use std::sync::Arc;

use musicup_core::{
    config::{Config, DaemonConfig},
    identity::IdentityResolver,
    ports::UploadClient,
};
use musicup_sync::{
    handler::{EventHandler, HandlerConfig},
    watcher::FileWatcher,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::DaemonError;

// ============================================================================
// Configuration resolution
// ============================================================================

/// Validates `config` and freezes it into a [`DaemonConfig`]
///
/// The resolver is consulted only when no uploader id was supplied, so a
/// host without networking can still run with an explicit id.
///
/// # Errors
/// [`DaemonError::Configuration`] if validation fails or no default id can be derived
pub fn resolve_daemon_config(
    config: &Config,
    resolver: &IdentityResolver,
) -> Result<DaemonConfig, DaemonError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let uploader_id = match &config.upload.uploader_id {
        Some(id) => id.clone(),
        None => resolver.resolve()?,
    };

    Ok(DaemonConfig::from_config(config, uploader_id))
}

// ============================================================================
// DaemonService
// ============================================================================

/// Watches one directory and uploads everything that appears in it
pub struct DaemonService {
    /// Frozen runtime configuration
    config: DaemonConfig,
    /// Not yet authenticated; shared with the handler after login
    client: Box<dyn UploadClient>,
}

impl DaemonService {
    pub fn new(config: DaemonConfig, client: impl UploadClient + 'static) -> Self {
        Self {
            config,
            client: Box::new(client),
        }
    }

    /// Runs the daemon until `shutdown` is cancelled
    ///
    /// An upload already in progress when the token fires is allowed to
    /// finish; nothing further is uploaded, whether the daemon was still in
    /// the initial scan or already watching. The watcher is always stopped
    /// before returning.
    ///
    /// # Errors
    /// - [`DaemonError::Authentication`] if login fails (nothing is scanned or watched)
    /// - [`DaemonError::Watcher`] if the watcher cannot start or its channel closes
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), DaemonError> {
        let Self { config, mut client } = self;

        info!("Init daemon - press Ctrl+C to quit");

        if !client.login(config.oauth(), config.uploader_id()).await {
            error!(
                credentials = %config.oauth().display(),
                uploader_id = %config.uploader_id(),
                "Error with oauth credentials"
            );
            return Err(DaemonError::Authentication);
        }

        let handler = EventHandler::new(HandlerConfig {
            client: Arc::from(client),
            root: config.directory().to_path_buf(),
            remove: config.remove(),
            transcode: config.transcode(),
            shutdown: shutdown.clone(),
        });

        handler.initial_scan().await;

        if shutdown.is_cancelled() {
            info!("Shutdown requested during initial scan");
            return Ok(());
        }

        let (mut watcher, mut events) = FileWatcher::new(config.channel_capacity())
            .map_err(|e| DaemonError::Watcher(format!("{e:#}")))?;
        watcher
            .watch(config.directory())
            .map_err(|e| DaemonError::Watcher(format!("{e:#}")))?;

        info!(directory = %config.directory().display(), "Watching for new files");

        let result = loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received, stopping watcher");
                    break Ok(());
                }

                event = events.recv() => match event {
                    Some(event) => {
                        let report = handler.handle(&event).await;
                        debug!(
                            attempted = report.files_attempted(),
                            deleted = report.files_deleted,
                            "Event handled"
                        );
                    }
                    None => {
                        warn!("Watcher event channel closed unexpectedly");
                        break Err(DaemonError::Watcher("event channel closed".into()));
                    }
                }
            }
        };

        watcher.stop();
        result
    }
}
