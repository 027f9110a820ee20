//! Configuration module for music-upload.
//!
//! Provides typed configuration structs that map to the optional YAML
//! configuration file, with loading, validation, defaults, and a builder
//! pattern for programmatic use.
//!
//! The daemon never reads [`Config`] directly: command-line flags are merged
//! on top of it and the result is frozen into a [`DaemonConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::UploaderId;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for music-upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upload: UploadConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub watch: WatchConfig,
}

/// What to upload and what to do afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory tree to scan and watch.
    pub directory: PathBuf,
    /// Credential file handed to the upload client.
    pub oauth: PathBuf,
    /// Delete local files once the service holds them.
    pub remove: bool,
    /// Identifier presented to the service. `None` derives it from the MAC address.
    pub uploader_id: Option<UploaderId>,
    /// Ask the service to transcode uploads.
    pub transcode: bool,
}

/// Remote music service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the upload API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Human-readable device name shown by the service next to the uploader id.
    pub uploader_name: String,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

/// Filesystem watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Capacity of the channel between the watcher thread and the daemon.
    pub channel_capacity: usize,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/music-upload/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("music-upload")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default credential file: `$HOME/oauth`.
pub fn default_oauth_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join("oauth")
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            oauth: default_oauth_path(),
            remove: false,
            uploader_id: None,
            transcode: true,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://music-manager.example.com/api".to_string(),
            timeout_secs: 600,
            uploader_name: "music-upload".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"service.timeout_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- upload ---
        if !self.upload.directory.is_dir() {
            errors.push(ValidationError {
                field: "upload.directory".into(),
                message: format!(
                    "directory does not exist: {}",
                    self.upload.directory.display()
                ),
            });
        }

        // --- service ---
        if !(self.service.base_url.starts_with("http://")
            || self.service.base_url.starts_with("https://"))
        {
            errors.push(ValidationError {
                field: "service.base_url".into(),
                message: format!("not an http(s) URL: '{}'", self.service.base_url),
            });
        }
        if self.service.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "service.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.service.uploader_name.trim().is_empty() {
            errors.push(ValidationError {
                field: "service.uploader_name".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        // --- watch ---
        if self.watch.channel_capacity == 0 {
            errors.push(ValidationError {
                field: "watch.channel_capacity".into(),
                message: "must be greater than 0".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] (or an existing config) and allows
/// selective overrides. The CLI uses it to layer flags over the file.
///
/// # Example
///
/// ```rust,no_run
/// use musicup_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .upload_directory(PathBuf::from("/home/user/Music"))
///     .upload_remove(true)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create a builder that overrides an already loaded configuration.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    // --- upload ---

    pub fn upload_directory(mut self, directory: PathBuf) -> Self {
        self.config.upload.directory = directory;
        self
    }

    pub fn upload_oauth(mut self, oauth: PathBuf) -> Self {
        self.config.upload.oauth = oauth;
        self
    }

    pub fn upload_remove(mut self, remove: bool) -> Self {
        self.config.upload.remove = remove;
        self
    }

    pub fn upload_uploader_id(mut self, uploader_id: UploaderId) -> Self {
        self.config.upload.uploader_id = Some(uploader_id);
        self
    }

    pub fn upload_transcode(mut self, transcode: bool) -> Self {
        self.config.upload.transcode = transcode;
        self
    }

    // --- service ---

    pub fn service_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.service.base_url = base_url.into();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- watch ---

    pub fn watch_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.watch.channel_capacity = capacity;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// DaemonConfig
// ---------------------------------------------------------------------------

/// Resolved runtime configuration, frozen before the daemon starts.
///
/// Unlike [`Config`], the uploader id is always present: either the caller's
/// or the one derived by the identity resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    directory: PathBuf,
    oauth: PathBuf,
    remove: bool,
    uploader_id: UploaderId,
    transcode: bool,
    channel_capacity: usize,
}

impl DaemonConfig {
    /// Freeze `config` with the given uploader id.
    pub fn from_config(config: &Config, uploader_id: UploaderId) -> Self {
        Self {
            directory: config.upload.directory.clone(),
            oauth: config.upload.oauth.clone(),
            remove: config.upload.remove,
            uploader_id,
            transcode: config.upload.transcode,
            channel_capacity: config.watch.channel_capacity,
        }
    }

    /// Minimal constructor mirroring the four command-line inputs.
    pub fn new(directory: PathBuf, oauth: PathBuf, remove: bool, uploader_id: UploaderId) -> Self {
        Self::from_config(
            &ConfigBuilder::new()
                .upload_directory(directory)
                .upload_oauth(oauth)
                .upload_remove(remove)
                .build(),
            uploader_id,
        )
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn oauth(&self) -> &Path {
        &self.oauth
    }

    pub fn remove(&self) -> bool {
        self.remove
    }

    pub fn uploader_id(&self) -> &UploaderId {
        &self.uploader_id
    }

    pub fn transcode(&self) -> bool {
        self.transcode
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
