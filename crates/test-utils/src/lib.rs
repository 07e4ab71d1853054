//! # Test Utilities
//!
//! Shared test utilities for the auth and image services.
//!
//! This crate provides:
//! - Fixture credential records and image files (`fixtures`)
//! - Server test harness (`TestAuthServer`, `TestImageServer`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let auth = TestAuthServer::spawn().await?;
//!     let images = TestImageServer::spawn(&auth).await?;
//!
//!     let token = auth.login(ALICE_USERNAME, ALICE_PASSWORD).await?;
//!     let nonce = images.request_nonce(&token).await?;
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use fixtures::*;
pub use server_harness::*;
