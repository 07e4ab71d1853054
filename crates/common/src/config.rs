//! Environment-variable parsing helpers shared by service configs.
//!
//! Each service owns its `Config` and `ConfigError`; these helpers cover the
//! value shapes both services read (bind address, positive durations).
//!
//! Values come from the process environment, optionally seeded by a `.env`
//! file in the working directory.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Dotenv file read at startup, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Errors for individual environment values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvValueError {
    #[error("{name} must be a valid positive integer, got '{value}'")]
    NotAnInteger { name: String, value: String },

    #[error("{name} must be greater than 0")]
    Zero { name: String },

    #[error("{name} must be a valid port number, got '{value}'")]
    InvalidPort { name: String, value: String },

    #[error("Failed to read {path}: {reason}")]
    DotEnv { path: String, reason: String },
}

/// Collect environment values for `Config::from_vars`.
///
/// Entries from the dotenv file at `dotenv_path` are loaded first and the
/// process environment is layered on top, so an exported variable always
/// wins. A missing file is not an error.
///
/// # Errors
///
/// Returns `EnvValueError::DotEnv` if the file exists but cannot be read or
/// parsed.
pub fn vars_with_dotenv(dotenv_path: &Path) -> Result<HashMap<String, String>, EnvValueError> {
    let dotenv_error = |e: dotenvy::Error| EnvValueError::DotEnv {
        path: dotenv_path.display().to_string(),
        reason: e.to_string(),
    };

    let mut vars = HashMap::new();
    match dotenvy::from_path_iter(dotenv_path) {
        Ok(entries) => {
            for entry in entries {
                let (key, value) = entry.map_err(dotenv_error)?;
                vars.insert(key, value);
            }
            tracing::debug!(
                target: "common.config",
                path = %dotenv_path.display(),
                count = vars.len(),
                "Loaded dotenv file"
            );
        }
        Err(e) if e.not_found() => {}
        Err(e) => return Err(dotenv_error(e)),
    }

    vars.extend(std::env::vars());
    Ok(vars)
}

/// Resolve the listening address.
///
/// `BIND_ADDRESS` wins when set. Otherwise `PORT` (or `default_port`) is
/// bound on all interfaces.
///
/// # Errors
///
/// Returns `EnvValueError::InvalidPort` if `PORT` is not a valid `u16`.
pub fn bind_address(
    vars: &HashMap<String, String>,
    default_port: u16,
) -> Result<String, EnvValueError> {
    if let Some(address) = vars.get("BIND_ADDRESS") {
        return Ok(address.clone());
    }

    let port = match vars.get("PORT") {
        Some(value) => parse_port("PORT", value)?,
        None => default_port,
    };

    Ok(format!("0.0.0.0:{port}"))
}

/// Parse a port number.
///
/// # Errors
///
/// Returns `EnvValueError::InvalidPort` for anything that is not a `u16`.
pub fn parse_port(name: &str, value: &str) -> Result<u16, EnvValueError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| EnvValueError::InvalidPort {
            name: name.to_string(),
            value: value.to_string(),
        })
}

/// Read a strictly positive integer, falling back to `default` when unset.
///
/// # Errors
///
/// Returns `EnvValueError::NotAnInteger` or `EnvValueError::Zero`.
pub fn positive_u64(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, EnvValueError> {
    Ok(optional_positive_u64(vars, name)?.unwrap_or(default))
}

/// Read a strictly positive integer that may be absent.
///
/// # Errors
///
/// Returns `EnvValueError::NotAnInteger` or `EnvValueError::Zero`.
pub fn optional_positive_u64(
    vars: &HashMap<String, String>,
    name: &str,
) -> Result<Option<u64>, EnvValueError> {
    let Some(value_str) = vars.get(name) else {
        return Ok(None);
    };

    let value: u64 = value_str
        .trim()
        .parse()
        .map_err(|_| EnvValueError::NotAnInteger {
            name: name.to_string(),
            value: value_str.clone(),
        })?;

    if value == 0 {
        return Err(EnvValueError::Zero {
            name: name.to_string(),
        });
    }

    Ok(Some(value))
}

/// Read a non-negative integer (zero allowed), falling back to `default`.
///
/// # Errors
///
/// Returns `EnvValueError::NotAnInteger` if the value does not parse.
pub fn u64_or(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, EnvValueError> {
    match vars.get(name) {
        Some(value_str) => {
            value_str
                .trim()
                .parse()
                .map_err(|_| EnvValueError::NotAnInteger {
                    name: name.to_string(),
                    value: value_str.clone(),
                })
        }
        None => Ok(default),
    }
}
