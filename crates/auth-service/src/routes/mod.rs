//! HTTP routes for the auth service.

use crate::handlers::{self, AppState};
use crate::middleware::require_session;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `POST /login` - Exchange credentials for a session token
/// - `GET /me` - Return the token's `details` claim (requires a session token)
/// - `GET /health` - Liveness probe
/// - `GET /metrics` - Prometheus metrics
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let public_routes = Router::new()
        .route("/login", post(handlers::handle_login))
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let protected_routes = Router::new()
        .route("/me", get(handlers::handle_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::LoginResponse;
    use crate::repositories::UserStore;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let vars = HashMap::from([("JWT_SECRET".to_string(), "routes-test-secret".to_string())]);
        let state = Arc::new(AppState {
            config: Config::from_vars(&vars).unwrap(),
            users: UserStore::from_json(
                r#"[{"username": "alice", "password": "pw1", "details": {"plan": "pro"}}]"#,
            )
            .unwrap(),
        });
        let handle = PrometheusBuilder::new().build_recorder().handle();
        build_routes(state, handle)
    }

    async fn login(app: Router, body: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_login_then_me() {
        let app = test_app();

        let response = login(app.clone(), r#"{"username":"alice","password":"pw1"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let LoginResponse { token } = serde_json::from_slice(&bytes).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let details: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(details, serde_json::json!({"plan": "pro"}));
    }

    #[tokio::test]
    async fn test_login_malformed_body_is_bad_request() {
        let response = login(test_app(), "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = login(test_app(), r#"{"username":"alice"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_without_content_type_is_bad_request() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .body(Body::from(r#"{"username":"alice","password":"pw1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_without_header_is_unauthorized() {
        let response = test_app()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
