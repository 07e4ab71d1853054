//! HTTP middleware for the auth service.

pub mod auth;

pub use auth::require_session;
