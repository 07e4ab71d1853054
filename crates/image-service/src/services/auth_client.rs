//! Auth service HTTP client.
//!
//! Confirms a caller's identity by forwarding their `Authorization` header
//! to the auth service's `GET /me`.
//!
//! # Security
//!
//! - The header is forwarded verbatim and never logged
//! - Connect and request timeouts bound the call
//! - No retries; any failure is terminal for the request

use crate::errors::ImageError;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{error, instrument, warn};

/// Upper bound on establishing the TCP connection to the auth service.
const AUTH_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Identity check used by `GET /validate`.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Ask the auth service whether `authorization` identifies a user.
    ///
    /// # Errors
    ///
    /// - `ImageError::Unauthorized` if the auth service answers 401
    /// - `ImageError::Internal` for any other failure
    async fn verify_identity(&self, authorization: &str) -> Result<(), ImageError>;
}

/// HTTP client for the auth service.
#[derive(Clone)]
pub struct AuthClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Full URL of the auth service `/me` endpoint.
    me_url: String,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Auth service base URL (e.g., "http://auth:3000")
    /// * `request_timeout` - Upper bound on the whole `/me` call
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(AUTH_CONNECT_TIMEOUT.min(request_timeout))
            .build()
            .map_err(|e| {
                error!(target: "image.services.auth_client", error = %e, "Failed to build HTTP client");
                ImageError::Internal(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            me_url: format!("{}/me", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl IdentityVerifier for AuthClient {
    #[instrument(skip_all, name = "image.services.auth_client.verify")]
    async fn verify_identity(&self, authorization: &str) -> Result<(), ImageError> {
        let response = self
            .client
            .get(&self.me_url)
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    target: "image.services.auth_client",
                    error = %e,
                    timeout = e.is_timeout(),
                    "Auth service request failed"
                );
                ImageError::Internal(format!("Auth service request failed: {e}"))
            })?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(target: "image.services.auth_client", "Auth service rejected identity");
            return Err(ImageError::Unauthorized);
        }

        warn!(
            target: "image.services.auth_client",
            status = status.as_u16(),
            "Auth service returned unexpected status"
        );
        Err(ImageError::Internal(format!(
            "Auth service returned unexpected status {status}"
        )))
    }
}

/// Mock identity verifier for tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Copy)]
    enum Outcome {
        Accept,
        Reject,
        Fail,
    }

    /// Identity verifier with a fixed outcome.
    pub struct MockIdentityVerifier {
        outcome: Outcome,
        call_count: AtomicUsize,
    }

    impl MockIdentityVerifier {
        /// Create a mock that accepts every caller.
        pub fn accepting() -> Self {
            Self::with_outcome(Outcome::Accept)
        }

        /// Create a mock that answers as if the auth service returned 401.
        pub fn rejecting() -> Self {
            Self::with_outcome(Outcome::Reject)
        }

        /// Create a mock that answers as if the auth service were down.
        pub fn failing() -> Self {
            Self::with_outcome(Outcome::Fail)
        }

        fn with_outcome(outcome: Outcome) -> Self {
            Self {
                outcome,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IdentityVerifier for MockIdentityVerifier {
        async fn verify_identity(&self, _authorization: &str) -> Result<(), ImageError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match self.outcome {
                Outcome::Accept => Ok(()),
                Outcome::Reject => Err(ImageError::Unauthorized),
                Outcome::Fail => Err(ImageError::Internal(
                    "Mock auth service failure".to_string(),
                )),
            }
        }
    }
}
