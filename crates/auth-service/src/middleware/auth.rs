//! Session token middleware for `/me`.
//!
//! Reads the `Authorization` header (raw token or `Bearer <token>`),
//! verifies it and injects the `SessionClaims` into request extensions.

use crate::errors::AuthError;
use crate::handlers::auth_handler::AppState;
use crate::services::token_service;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};
use common::jwt::extract_bearer_token;
use std::sync::Arc;
use tracing::instrument;

/// Require a valid session token.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing or invalid
/// - Continues to next handler with `SessionClaims` in extensions otherwise
#[instrument(skip_all, name = "auth.middleware.session")]
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "auth.middleware.session", "Missing Authorization header");
            AuthError::InvalidToken("Missing Authorization header".to_string())
        })?;

    let token = extract_bearer_token(header_value).ok_or_else(|| {
        tracing::debug!(target: "auth.middleware.session", "Empty Authorization header");
        AuthError::InvalidToken("Empty Authorization header".to_string())
    })?;

    let claims = token_service::verify_session_token(
        token,
        &state.config.jwt_secret,
        state.config.require_token_expiry(),
    )?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
