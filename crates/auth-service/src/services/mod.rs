//! Business logic for the auth service.

pub mod token_service;
