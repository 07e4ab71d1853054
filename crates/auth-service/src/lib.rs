//! Auth Service Library
//!
//! Issues HS256 session tokens for static credential records and verifies
//! them on behalf of other services.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Session token verification middleware
//! - `models` - Request, response and credential types
//! - `repositories` - Credential record store
//! - `routes` - Router assembly
//! - `services` - Token issuance and verification

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
