//! Auth service configuration.
//!
//! Configuration is loaded from environment variables. The signing secret
//! is redacted in Debug output.

use common::config::{
    bind_address, optional_positive_u64, u64_or, vars_with_dotenv, EnvValueError, DOTENV_FILE,
};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default location of the credential records file.
pub const DEFAULT_USERS_FILE: &str = "users.json";

/// Auth service configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:3000").
    pub bind_address: String,

    /// HS256 secret used to sign and verify session tokens.
    pub jwt_secret: SecretString,

    /// Path to the JSON credential records.
    pub users_file: PathBuf,

    /// Session token lifetime. `None` issues tokens without an `exp` claim.
    pub session_token_ttl: Option<Duration>,

    /// Seconds to wait after a shutdown signal before exiting.
    pub shutdown_drain_seconds: u64,
}

/// Custom Debug implementation that redacts the signing secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("users_file", &self.users_file)
            .field("session_token_ttl", &self.session_token_ttl)
            .field("shutdown_drain_seconds", &self.shutdown_drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

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

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::InvalidSecret(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let users_file = vars
            .get("USERS_FILE")
            .cloned()
            .unwrap_or_else(|| DEFAULT_USERS_FILE.to_string())
            .into();

        let session_token_ttl =
            optional_positive_u64(vars, "SESSION_TOKEN_TTL_SECONDS")?.map(Duration::from_secs);

        let shutdown_drain_seconds = u64_or(vars, "SHUTDOWN_DRAIN_SECONDS", 0)?;

        Ok(Config {
            bind_address,
            jwt_secret,
            users_file,
            session_token_ttl,
            shutdown_drain_seconds,
        })
    }

    /// Whether verification should insist on an `exp` claim.
    pub fn require_token_expiry(&self) -> bool {
        self.session_token_ttl.is_some()
    }

    /// Length of the configured secret, for startup logging.
    pub fn jwt_secret_len(&self) -> usize {
        self.jwt_secret.expose_secret().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "JWT_SECRET".to_string(),
            "sdnjkawndjkwndjkandjkn129329439084324".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.users_file, PathBuf::from("users.json"));
        assert_eq!(config.session_token_ttl, None);
        assert_eq!(config.shutdown_drain_seconds, 0);
        assert!(!config.require_token_expiry());
        assert_eq!(
            config.jwt_secret.expose_secret(),
            "sdnjkawndjkwndjkandjkn129329439084324"
        );
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("PORT".to_string(), "4000".to_string());
        vars.insert("USERS_FILE".to_string(), "/etc/auth/users.json".to_string());
        vars.insert("SESSION_TOKEN_TTL_SECONDS".to_string(), "3600".to_string());
        vars.insert("SHUTDOWN_DRAIN_SECONDS".to_string(), "5".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "0.0.0.0:4000");
        assert_eq!(config.users_file, PathBuf::from("/etc/auth/users.json"));
        assert_eq!(config.session_token_ttl, Some(Duration::from_secs(3600)));
        assert_eq!(config.shutdown_drain_seconds, 5);
        assert!(config.require_token_expiry());
    }

    #[test]
    fn test_bind_address_overrides_port() {
        let mut vars = base_vars();
        vars.insert("PORT".to_string(), "4000".to_string());
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        assert_eq!(config.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_from_vars_missing_secret() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "JWT_SECRET"));
    }

    #[test]
    fn test_from_vars_empty_secret() {
        let vars = HashMap::from([("JWT_SECRET".to_string(), "   ".to_string())]);
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidSecret(_))));
    }

    #[test]
    fn test_session_ttl_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("SESSION_TOKEN_TTL_SECONDS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue(EnvValueError::Zero { name })) if name == "SESSION_TOKEN_TTL_SECONDS")
        );
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut vars = base_vars();
        vars.insert("PORT".to_string(), "not-a-port".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue(EnvValueError::InvalidPort { .. }))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");
        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sdnjkawndjkwndjkandjkn"));
    }
}
