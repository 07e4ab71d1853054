//! Background tasks for the image service.
//!
//! # Tasks
//!
//! - `nonce_sweeper` - Purges expired nonces nobody came back for

pub mod nonce_sweeper;

pub use nonce_sweeper::start_nonce_sweeper;
