//! Command-line arguments
//!
//! Flags override the configuration file, which overrides built-in defaults.
//! Every upload flag is therefore optional here; the defaults shown in
//! `--help` are the ones [`Config::default`] supplies.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use musicup_core::{
    config::{Config, ConfigBuilder},
    domain::UploaderId,
};
use musicup_daemon::DaemonError;

#[derive(Debug, Parser)]
#[command(
    name = "music-upload",
    version,
    about = "Watch a directory and upload new music files to your library"
)]
pub struct Cli {
    /// Music folder to upload from [default: .]
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Path to the oauth credential file [default: ~/oauth]
    #[arg(short = 'a', long)]
    pub oauth: Option<PathBuf>,

    /// Remove local files once uploaded or matched
    #[arg(short = 'r', long)]
    pub remove: bool,

    /// Uploader identification, usually an upper-case MAC address
    /// [default: MAC address of the default-route interface]
    #[arg(short = 'u', long = "uploader_id")]
    pub uploader_id: Option<UploaderId>,

    /// Use alternate config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Base URL of the music service API
    #[arg(long)]
    pub service_url: Option<String>,

    /// Upload files as-is instead of asking the service to transcode
    #[arg(long)]
    pub no_transcode: bool,
}

impl Cli {
    /// Loads the configuration file and applies the flags on top
    ///
    /// A missing default file yields defaults; a file named with `--config`
    /// must load.
    ///
    /// # Errors
    /// [`DaemonError::Configuration`] if the `--config` file cannot be loaded
    pub fn load_config(&self) -> Result<Config, DaemonError> {
        let base = match &self.config {
            Some(path) => Config::load(path).map_err(|e| {
                DaemonError::Configuration(format!("cannot load {}: {e:#}", path.display()))
            })?,
            None => Config::load_or_default(&Config::default_path()),
        };

        Ok(self.apply(base))
    }

    /// Overlays the flags that were given onto `config`
    pub fn apply(&self, config: Config) -> Config {
        let mut builder = ConfigBuilder::from_config(config);

        if let Some(directory) = &self.directory {
            builder = builder.upload_directory(directory.clone());
        }
        if let Some(oauth) = &self.oauth {
            builder = builder.upload_oauth(oauth.clone());
        }
        if self.remove {
            builder = builder.upload_remove(true);
        }
        if let Some(id) = &self.uploader_id {
            builder = builder.upload_uploader_id(id.clone());
        }
        if let Some(url) = &self.service_url {
            builder = builder.service_base_url(url.clone());
        }
        if self.no_transcode {
            builder = builder.upload_transcode(false);
        }

        builder.build()
    }

    /// Log level: `-v` flags win, otherwise the configured level
    pub fn log_level(&self, config: &Config) -> String {
        match self.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}
