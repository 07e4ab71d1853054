//! Common utilities and types shared by the auth and image services.

#![warn(clippy::pedantic)]

/// Module for environment-variable parsing helpers
pub mod config;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for session token signing and verification
pub mod jwt;
