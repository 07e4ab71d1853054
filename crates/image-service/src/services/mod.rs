//! Service layer for the image service.
//!
//! # Components
//!
//! - `auth_client` - HTTP client for the auth service `/me` endpoint
//! - `nonce_manager` - Single-use, time-boxed nonce store
//! - `resource_store` - Confined file access under the image root

pub mod auth_client;
pub mod nonce_manager;
pub mod resource_store;

pub use auth_client::{AuthClient, IdentityVerifier};
pub use nonce_manager::{NonceError, NonceManager};
pub use resource_store::{Resource, ResourceStore};
