//! Optional `newsfeed.ron` configuration.
//!
//! Every field may be omitted. Environment variables win over the file for
//! provider settings; the credential itself only comes from the environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use newsfeed_engine::{SourceSettings, BASE_URL_ENV, COUNTRY_ENV};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "newsfeed.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the bookmark slot is stored.
    pub data_dir: Option<PathBuf>,
    pub log_destination: LogDestination,
    pub base_url: Option<String>,
    pub country: Option<String>,
    /// Bound on a single provider call. Unset leaves it unbounded.
    pub request_timeout_secs: Option<u64>,
    /// How long the CLI waits for a feed before giving up.
    pub wait_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_destination: LogDestination::default(),
            base_url: None,
            country: None,
            request_timeout_secs: None,
            wait_secs: 30,
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    /// `./newsfeed.ron` if present, otherwise `<config dir>/newsfeed/newsfeed.ron`.
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILENAME);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .map(|dir| dir.join("newsfeed").join(CONFIG_FILENAME))
            .unwrap_or(local)
    }

    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("newsfeed"))
            .unwrap_or_else(|| PathBuf::from(".newsfeed"))
    }

    /// Provider settings: environment first, then this file, then defaults.
    pub fn source_settings(&self, lookup: impl Fn(&str) -> Option<String>) -> SourceSettings {
        let mut settings = SourceSettings::from_lookup(&lookup);
        let unset = |key: &str| lookup(key).map_or(true, |value| value.trim().is_empty());

        if unset(BASE_URL_ENV) {
            if let Some(base_url) = &self.base_url {
                settings.base_url = base_url.clone();
            }
        }
        if unset(COUNTRY_ENV) {
            if let Some(country) = &self.country {
                settings.country = country.clone();
            }
        }
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        settings
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_secs.max(1))
    }
}
