//! Observability for the auth service.
//!
//! Metrics use bounded label values only. Usernames, passwords and tokens
//! never appear in metric labels or log fields.

pub mod metrics;
