//! Data access layer for the auth service.

pub mod users;

pub use users::{UserStore, UserStoreError};
