//! Configuration Module
//!
//! Handles loading server configuration from environment variables,
//! optionally supplied by a local `.env` file.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Default HTTP port when `HTTP_PORT` is unset.
const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default sweep interval in seconds.
const DEFAULT_SWEEP_INTERVAL: u64 = 60;
/// Default auto-save interval in seconds.
const DEFAULT_AUTOSAVE_INTERVAL: u64 = 300;
/// Default snapshot file, relative to the working directory.
const DEFAULT_SNAPSHOT_PATH: &str = "memstash_data.json";

/// Errors raised while reading configuration; all of them are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TCP text-protocol listen port
    pub tcp_port: u16,
    /// HTTP server port
    pub http_port: u16,
    /// Expiration sweep interval in seconds
    pub sweep_interval: u64,
    /// Snapshot auto-save interval in seconds
    pub autosave_interval: u64,
    /// Snapshot file path
    pub snapshot_path: PathBuf,
}

impl Config {
    /// Loads configuration from the environment, consulting a `.env` file
    /// first if one exists.
    ///
    /// # Environment Variables
    /// - `CAPACITY` / `Memory` - maximum cache entries; one of the two is
    ///   required, `CAPACITY` wins when both are set
    /// - `TCP_PORT` - TCP listen port (required)
    /// - `HTTP_PORT` - HTTP listen port (default: 8080)
    /// - `SWEEP_INTERVAL` - expiration sweep interval in seconds (default: 60)
    /// - `AUTOSAVE_INTERVAL` - auto-save interval in seconds (default: 300)
    /// - `SNAPSHOT_PATH` - snapshot file path (default: memstash_data.json)
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; variables may come from the process
        // environment directly.
        let _ = dotenvy::dotenv();

        let capacity = match env::var("CAPACITY").ok().filter(|v| !v.is_empty()) {
            Some(raw) => parse_var("CAPACITY", &raw)?,
            None => match env::var("Memory").ok().filter(|v| !v.is_empty()) {
                Some(raw) => parse_var("Memory", &raw)?,
                None => return Err(ConfigError::Missing("CAPACITY (or Memory)")),
            },
        };
        if capacity == 0 {
            return Err(ConfigError::Invalid(
                "CAPACITY",
                "must be a positive integer".to_string(),
            ));
        }

        let tcp_port = match env::var("TCP_PORT").ok().filter(|v| !v.is_empty()) {
            Some(raw) => parse_var("TCP_PORT", &raw)?,
            None => return Err(ConfigError::Missing("TCP_PORT")),
        };

        let http_port = parse_var_or("HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let sweep_interval = parse_var_or("SWEEP_INTERVAL", DEFAULT_SWEEP_INTERVAL)?;
        let autosave_interval = parse_var_or("AUTOSAVE_INTERVAL", DEFAULT_AUTOSAVE_INTERVAL)?;

        let snapshot_path = env::var("SNAPSHOT_PATH")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        Ok(Self {
            capacity,
            tcp_port,
            http_port,
            sweep_interval,
            autosave_interval,
            snapshot_path,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::Invalid(name, format!("'{raw}' is not a valid integer")))
}

fn parse_var_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name).ok().filter(|v| !v.is_empty()) {
        Some(raw) => parse_var(name, &raw),
        None => Ok(default),
    }
}
