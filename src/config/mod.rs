//! # Configuration Management Module
//!
//! TOML-backed configuration for the petshell client. Every value has a
//! working default, so the binary runs with no config file at all; a partial
//! file overrides just the keys it names.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - Backend endpoint
//! - [`StorageConfig`] - Client cache location
//! - [`PetConfig`] - Care stat decay cadence
//! - [`LoggingConfig`] - Log level and optional file sink
//!
//! ## Usage
//!
//! ```rust,no_run
//! use petshell::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("petshell.toml").await?;
//!     println!("backend: {}", config.server.base_url);
//!
//!     // Write a starter file
//!     Config::create_default("petshell.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:5000"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [pet]
//! decay_interval_secs = 30
//!
//! [logging]
//! level = "info"
//! file = "petshell.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub pet: PetConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the backend. A trailing slash is tolerated.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the client cache database.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Seconds between background decay applications.
    pub decay_interval_secs: u64,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            decay_interval_secs: 30,
        }
    }
}

impl PetConfig {
    /// Decay cadence as a [`Duration`], floored at one second.
    pub fn decay_interval(&self) -> Duration {
        Duration::from_secs(self.decay_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level when no `-v` flag is given: "error", "warn", "info",
    /// "debug", or "trace".
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append log lines to this file. When stdout is a terminal the lines
    /// also echo to the console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}
