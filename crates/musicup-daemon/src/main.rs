//! music-upload - watch a directory and upload new music files
//!
//! Runs in the foreground until interrupted:
//! - Authenticates against the music service
//! - Uploads every file already under the directory
//! - Watches the directory and uploads files as they are created
//! - Stops the watcher on SIGINT/SIGTERM and exits 0
//!
//! Exit codes: `0` clean shutdown, `1` authentication (or watcher) failure,
//! `2` configuration error.

use std::process::ExitCode;

use clap::Parser;
use musicup_client::client::MusicManagerClient;
use musicup_core::{config::Config, identity::IdentityResolver};
use musicup_daemon::{error::EXIT_OK, resolve_daemon_config, DaemonError, DaemonService};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

/// Waits for SIGINT (Ctrl+C) or SIGTERM and cancels `token`
///
/// If a handler cannot be installed, that signal is logged and ignored.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

async fn run(config: Config) -> Result<(), DaemonError> {
    let daemon_config = resolve_daemon_config(&config, &IdentityResolver::new())?;
    let client = MusicManagerClient::new(&config.service)
        .map_err(|e| DaemonError::Configuration(format!("{e:#}")))?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    DaemonService::new(daemon_config, client).run(shutdown).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    init_tracing(&cli.log_level(&config));

    match run(config).await {
        Ok(()) => {
            info!("music-upload shut down gracefully");
            ExitCode::from(EXIT_OK)
        }
        Err(err) => {
            error!(error = %err, "music-upload exiting with error");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
