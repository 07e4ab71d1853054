//! Image service configuration.
//!
//! Configuration is loaded from environment variables, seeded by an optional
//! `.env` file in the working directory.

use common::config::{
    bind_address, parse_port, positive_u64, u64_or, vars_with_dotenv, EnvValueError, DOTENV_FILE,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default nonce lifetime in milliseconds.
pub const DEFAULT_NONCE_TIMEOUT_MS: u64 = 60_000;

/// Default interval between background sweeps of expired nonces.
pub const DEFAULT_NONCE_SWEEP_INTERVAL_MS: u64 = 10_000;

/// Default timeout for the auth-service `/me` call.
pub const DEFAULT_AUTH_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Default directory images are served from.
pub const DEFAULT_IMAGE_ROOT: &str = "images";

/// Image service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:3001").
    pub bind_address: String,

    /// Hostname of the auth service.
    pub auth_server_hostname: String,

    /// Port of the auth service.
    pub auth_server_port: u16,

    /// How long an issued nonce stays valid.
    pub nonce_timeout: Duration,

    /// How often the sweeper purges expired nonces.
    pub nonce_sweep_interval: Duration,

    /// Upper bound on the `/me` call, connect included.
    pub auth_request_timeout: Duration,

    /// Root directory for `/images/*`.
    pub image_root: PathBuf,

    /// Seconds to wait after a shutdown signal before exiting.
    pub shutdown_drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    InvalidValue(#[from] EnvValueError),
}

impl Config {
    /// Load configuration from the process environment, seeded by `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&vars_with_dotenv(Path::new(DOTENV_FILE))?)
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = bind_address(vars, DEFAULT_PORT)?;

        let auth_server_hostname = vars
            .get("AUTH_SERVER_HOSTNAME")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_SERVER_HOSTNAME".to_string()))?
            .clone();

        let auth_server_port = vars
            .get("AUTH_SERVER_PORT")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_SERVER_PORT".to_string()))?;
        let auth_server_port = parse_port("AUTH_SERVER_PORT", auth_server_port)?;

        let nonce_timeout = Duration::from_millis(positive_u64(
            vars,
            "NONCE_TIMEOUT",
            DEFAULT_NONCE_TIMEOUT_MS,
        )?);

        let nonce_sweep_interval = Duration::from_millis(positive_u64(
            vars,
            "NONCE_SWEEP_INTERVAL_MS",
            DEFAULT_NONCE_SWEEP_INTERVAL_MS,
        )?);

        let auth_request_timeout = Duration::from_millis(positive_u64(
            vars,
            "AUTH_REQUEST_TIMEOUT_MS",
            DEFAULT_AUTH_REQUEST_TIMEOUT_MS,
        )?);

        let image_root = vars
            .get("IMAGE_ROOT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_IMAGE_ROOT.to_string())
            .into();

        let shutdown_drain_seconds = u64_or(vars, "SHUTDOWN_DRAIN_SECONDS", 0)?;

        Ok(Config {
            bind_address,
            auth_server_hostname,
            auth_server_port,
            nonce_timeout,
            nonce_sweep_interval,
            auth_request_timeout,
            image_root,
            shutdown_drain_seconds,
        })
    }

    /// Base URL of the auth service, without a trailing slash.
    pub fn auth_server_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.auth_server_hostname, self.auth_server_port
        )
    }
}
