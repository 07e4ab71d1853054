//! Cross-service integration tests for the auth and image services.
//!
//! The tests live in `tests/` and run both services in-process on random
//! ports via `test-utils`.
