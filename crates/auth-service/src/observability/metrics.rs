//! Metrics definitions for the auth service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix
//! - `_total` suffix for counters
//!
//! Label `status` takes one of a fixed set of values per metric.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and return its handle.
///
/// # Errors
///
/// Returns error if a recorder is already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record a login attempt.
///
/// Metric: `auth_login_total`
/// Labels: `status` ("success", "invalid_credentials", "bad_request", "error")
pub fn record_login(status: &'static str) {
    counter!("auth_login_total", "status" => status).increment(1);
}

/// Record a session token verification.
///
/// Metric: `auth_token_verifications_total`
/// Labels: `status` ("valid", "invalid")
pub fn record_token_verification(status: &'static str) {
    counter!("auth_token_verifications_total", "status" => status).increment(1);
}
