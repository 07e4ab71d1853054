//! Image Service Library
//!
//! Exchanges session tokens for single-use nonces and serves image files to
//! requests that present one.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `routes` - Router assembly and application state
//! - `services` - Nonce store, auth client and resource store
//! - `tasks` - Background nonce sweeper

pub mod config;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod services;
pub mod tasks;
