//! Observability for the image service.
//!
//! Nonce values and session tokens never appear in metric labels or log
//! fields.

pub mod metrics;
