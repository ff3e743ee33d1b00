//! Session configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for talking to the presentation service.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Host of the presentation service (or interface to listen on).
    #[serde(default = "default_host")]
    host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    port: u16,

    /// Application name used in `provide` and `update` payloads.
    #[serde(default = "default_app_name")]
    app_name: String,

    /// Identity sent in the `appConnect` handshake.
    #[serde(default = "default_client_identity")]
    client_identity: String,

    /// Pause before announcing a win, in milliseconds.
    #[serde(default = "default_win_grace_ms")]
    win_grace_ms: u64,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    8001
}

#[instrument]
fn default_app_name() -> String {
    "fliesdemo".to_string()
}

#[instrument]
fn default_client_identity() -> String {
    "doflies".to_string()
}

#[instrument]
fn default_win_grace_ms() -> u64 {
    1500
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_name: default_app_name(),
            client_identity: default_client_identity(),
            win_grace_ms: default_win_grace_ms(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(app_name = %config.app_name, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads from `path` when it exists, otherwise falls back to defaults.
    #[instrument]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                info!("Config file not found at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Replaces host and port where the command line gave them.
    pub fn with_endpoint(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Sets the win announcement pause.
    pub fn with_win_grace(mut self, grace: Duration) -> Self {
        self.win_grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The win announcement pause as a [`Duration`].
    pub fn win_grace(&self) -> Duration {
        Duration::from_millis(self.win_grace_ms)
    }

    /// `host:port` for connecting or binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
