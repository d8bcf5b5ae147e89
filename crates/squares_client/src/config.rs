//! Client configuration.
//!
//! Values come from, lowest precedence first: built-in defaults, a TOML file,
//! the `SQUARES_SERVER_URL` environment variable (a `.env` file is honored),
//! and finally command-line flags applied by the binary.

use crate::machine::{FirstMover, GameSetup};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use squares_board::{Color, MAX_BOARD_SIZE};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the server URL.
pub const SERVER_URL_ENV: &str = "SQUARES_SERVER_URL";

/// Smallest board the service accepts.
pub const MIN_PLAYABLE_SIZE: usize = 3;

/// Configuration for the game client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Base URL of the game service API.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Board size for new games.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Color the local player uses.
    #[serde(default = "default_human_color")]
    human_color: Color,

    /// Who moves first.
    #[serde(default)]
    first_mover: FirstMover,

    /// Per-call timeout in milliseconds; `0` waits forever.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080/api/squares".to_string()
}

fn default_board_size() -> usize {
    5
}

fn default_human_color() -> Color {
    Color::White
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            board_size: default_board_size(),
            human_color: default_human_color(),
            first_mover: FirstMover::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, falls back to defaults, then applies the
    /// environment.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                info!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            debug!(url = %url, "Server URL taken from environment");
            config.server_url = url;
        }
        Ok(config)
    }

    /// Checks values the service would reject.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_PLAYABLE_SIZE {
            return Err(ConfigError::new(format!(
                "Board size must be at least {}, got {}",
                MIN_PLAYABLE_SIZE, self.board_size
            )));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::new(format!(
                "Board size must be at most {}, got {}",
                MAX_BOARD_SIZE, self.board_size
            )));
        }
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::new("Server URL is empty".to_string()));
        }
        Ok(())
    }

    /// Call bound, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    /// Setup for a new game at the configured size.
    pub fn game_setup(&self) -> GameSetup {
        GameSetup::new(self.board_size)
            .with_human(self.human_color)
            .with_first_mover(self.first_mover)
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
