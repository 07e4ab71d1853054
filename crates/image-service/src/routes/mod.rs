//! HTTP routes for the image service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::errors::ImageError;
use crate::handlers;
use crate::services::{AuthClient, IdentityVerifier, NonceManager, ResourceStore};
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Process-wide active nonce set.
    pub nonces: Arc<NonceManager>,

    /// Identity check against the auth service.
    pub identity: Arc<dyn IdentityVerifier>,

    /// Files served under `/images/*`.
    pub resources: ResourceStore,
}

impl AppState {
    /// Build state from configuration, talking to the real auth service.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::Internal` if the HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self, ImageError> {
        let identity = AuthClient::new(&config.auth_server_url(), config.auth_request_timeout)?;
        Ok(Self::with_verifier(config, Arc::new(identity)))
    }

    /// Build state with a caller-supplied identity verifier.
    pub fn with_verifier(config: Config, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            nonces: Arc::new(NonceManager::new(config.nonce_timeout)),
            resources: ResourceStore::new(config.image_root.clone()),
            identity,
            config,
        }
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `GET /validate` - Exchange a session token for a nonce
/// - `GET /images/*path` - Nonce-gated file fetch
/// - `GET /health` - Liveness probe
/// - `GET /metrics` - Prometheus metrics
/// - TraceLayer for request logging
/// - 30 second request timeout
///
/// Any other path answers 404.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let app_routes = Router::new()
        .route("/validate", get(handlers::request_nonce))
        .route("/images/*path", get(handlers::get_image))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    app_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
