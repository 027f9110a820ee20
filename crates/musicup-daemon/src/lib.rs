//! music-upload daemon - library entry point
//!
//! [`DaemonService`] runs the whole lifecycle: login, initial scan, watch,
//! and shutdown on cancellation. The `music-upload` binary is a thin CLI
//! around it; embedders can drive it directly:
//!
//! ```rust,no_run
//! use musicup_client::client::MusicManagerClient;
//! use musicup_core::{config::Config, identity::IdentityResolver};
//! use musicup_daemon::{resolve_daemon_config, DaemonService};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let daemon_config = resolve_daemon_config(&config, &IdentityResolver::new())?;
//! let client = MusicManagerClient::new(&config.service)?;
//! DaemonService::new(daemon_config, client)
//!     .run(CancellationToken::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod service;

pub use error::DaemonError;
pub use service::{resolve_daemon_config, DaemonService};
