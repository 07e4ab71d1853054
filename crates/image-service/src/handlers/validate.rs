//! Delegated access gateway.
//!
//! Exchanges a session token for a nonce after the auth service confirms
//! the caller's identity.

use crate::errors::ImageError;
use crate::observability::metrics::record_auth_check;
use crate::routes::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Body of a successful `GET /validate`.
#[derive(Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
}

/// Handler for GET /validate
///
/// # Response
///
/// - 200 `{"nonce": "..."}` when the auth service accepts the header
/// - 401 when the header is absent or the auth service answers 401
/// - 500 for any other auth service failure; no nonce is minted
#[instrument(skip_all, name = "image.handlers.validate")]
pub async fn request_nonce(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<NonceResponse>, ImageError> {
    let Some(authorization) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        tracing::debug!(target: "image.handlers.validate", "Missing Authorization header");
        record_auth_check("missing_header");
        return Err(ImageError::Unauthorized);
    };

    match state.identity.verify_identity(authorization).await {
        Ok(()) => record_auth_check("authorized"),
        Err(ImageError::Unauthorized) => {
            record_auth_check("unauthorized");
            return Err(ImageError::Unauthorized);
        }
        Err(e) => {
            record_auth_check("error");
            return Err(e);
        }
    }

    let nonce = state
        .nonces
        .issue()
        .map_err(|e| ImageError::Internal(e.to_string()))?;

    Ok(Json(NonceResponse { nonce }))
}
