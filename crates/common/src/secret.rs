//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for passwords, the session-token signing secret, and anything else that
//! must never show up in a log line.
//!
//! `SecretString` implements `Debug` with redaction, so any struct that
//! derives `Debug` and holds a secret gets safe logging behavior for free.
//! Secrets are zeroized when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct LoginRequest {
//!     username: String,
//!     password: SecretString,
//! }
//!
//! let req = LoginRequest {
//!     username: "alice".to_string(),
//!     password: SecretString::from("pw1"),
//! };
//!
//! assert!(!format!("{req:?}").contains("pw1"));
//! assert_eq!(req.password.expose_secret(), "pw1");
//! ```
//!
//! With the `serde` feature enabled (always on in this workspace), secrets
//! deserialize straight from JSON, which is how credential records and login
//! bodies are read.

pub use secrecy::{ExposeSecret, SecretString};
