//! Metrics definitions for the image service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `image_` prefix
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Every `status` label is drawn from a fixed set listed on the recording
//! function. Request paths are never used as labels.

use metrics::{counter, gauge};
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

// ============================================================================
// Nonce Metrics
// ============================================================================

/// Record a newly issued nonce.
///
/// Metric: `image_nonce_issued_total`
pub fn record_nonce_issued() {
    counter!("image_nonce_issued_total").increment(1);
}

/// Record a consumption attempt.
///
/// Metric: `image_nonce_consumed_total`
/// Labels: `status` ("accepted", "rejected")
pub fn record_nonce_consumed(accepted: bool) {
    let status = if accepted { "accepted" } else { "rejected" };
    counter!("image_nonce_consumed_total", "status" => status).increment(1);
}

/// Record nonces dropped because their deadline passed.
///
/// Metric: `image_nonce_expired_total`
pub fn record_nonces_expired(count: usize) {
    if count > 0 {
        counter!("image_nonce_expired_total").increment(count as u64);
    }
}

/// Set the current size of the active nonce set.
///
/// Metric: `image_active_nonces`
#[allow(clippy::cast_precision_loss)] // Active set size is far below 2^52
pub fn set_active_nonces(count: usize) {
    gauge!("image_active_nonces").set(count as f64);
}

// ============================================================================
// Gateway and Resource Metrics
// ============================================================================

/// Record the outcome of an identity check against the auth service.
///
/// Metric: `image_auth_check_total`
/// Labels: `status` ("authorized", "unauthorized", "missing_header", "error")
pub fn record_auth_check(status: &'static str) {
    counter!("image_auth_check_total", "status" => status).increment(1);
}

/// Record the outcome of a resource fetch.
///
/// Metric: `image_resource_fetch_total`
/// Labels: `status` ("served", "missing_nonce", "invalid_nonce", "not_found")
pub fn record_resource_fetch(status: &'static str) {
    counter!("image_resource_fetch_total", "status" => status).increment(1);
}
