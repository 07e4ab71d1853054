use crate::config::Config;
use crate::errors::AuthError;
use crate::models::{LoginRequest, LoginResponse};
use crate::observability::metrics::record_login;
use crate::repositories::UserStore;
use crate::services::token_service;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use common::jwt::SessionClaims;
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
}

/// Handle login request
///
/// POST /login
///
/// Any body that is not JSON with both `username` and `password` is a 400.
#[instrument(skip_all, name = "auth.handlers.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(
            target: "auth.handlers.login",
            reason = %rejection.body_text(),
            "Login body rejected"
        );
        record_login("bad_request");
        AuthError::BadRequest(rejection.body_text())
    })?;

    let token = token_service::issue_session_token(
        &state.users,
        &state.config.jwt_secret,
        &payload.username,
        payload.password.expose_secret(),
        state.config.session_token_ttl,
    )?;

    Ok(Json(LoginResponse { token }))
}

/// Return the `details` claim of the caller's session token.
///
/// GET /me
///
/// Runs behind `require_session`, which has already verified the token.
#[instrument(skip_all, name = "auth.handlers.me")]
pub async fn handle_me(Extension(claims): Extension<SessionClaims>) -> Json<serde_json::Value> {
    Json(claims.details)
}
