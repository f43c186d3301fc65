//! Configuration file handling for econet-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Factory credentials of ecoNET controllers
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Controller hostname or URL
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("econet-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &ArgOverrides<'_>) -> Result<MergedConfig> {
        let host = args
            .host
            .map(String::from)
            .or_else(|| self.host.clone())
            .context("No controller host given (use --host, ECONET_HOST or the config file)")?;

        Ok(MergedConfig {
            host,
            username: args
                .username
                .map(String::from)
                .or_else(|| self.username.clone())
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: args
                .password
                .map(String::from)
                .or_else(|| self.password.clone())
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            timeout: Duration::from_secs(
                args.timeout
                    .or(self.timeout)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            output: args
                .output
                .map(String::from)
                .or_else(|| self.output.clone())
                .unwrap_or_else(|| "table".to_string()),
            no_color: args.no_color || self.no_color.unwrap_or(false),
        })
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default)]
pub struct ArgOverrides<'a> {
    pub host: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub timeout: Option<u64>,
    pub output: Option<&'a str>,
    pub no_color: bool,
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub output: String,
    pub no_color: bool,
}
