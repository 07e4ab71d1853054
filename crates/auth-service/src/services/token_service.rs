//! Session token issuance and verification.
//!
//! Issuance checks the presented credentials against the static records and
//! signs `{username, details, iat[, exp]}` with the shared secret.
//! Verification is stateless.

use crate::errors::AuthError;
use crate::observability::metrics::{record_login, record_token_verification};
use crate::repositories::UserStore;
use common::jwt::{self, SessionClaims};
use common::secret::SecretString;
use std::time::Duration;
use tracing::instrument;

/// Issue a session token for a matching credential record.
///
/// # Errors
///
/// - `AuthError::InvalidCredentials` if no record matches exactly
/// - `AuthError::Internal` if signing fails
#[instrument(skip_all, name = "auth.services.issue_token")]
pub fn issue_session_token(
    users: &UserStore,
    secret: &SecretString,
    username: &str,
    password: &str,
    ttl: Option<Duration>,
) -> Result<String, AuthError> {
    let Some(record) = users.find_by_credentials(username, password) else {
        tracing::debug!(target: "auth.services.token", "Login rejected: no matching credential record");
        record_login("invalid_credentials");
        return Err(AuthError::InvalidCredentials);
    };

    let claims = SessionClaims::issue_now(record.username.clone(), record.details.clone(), ttl);

    let token = jwt::sign_session_token(&claims, secret).map_err(|e| {
        record_login("error");
        AuthError::Internal(e.to_string())
    })?;

    record_login("success");
    tracing::info!(
        target: "auth.services.token",
        expiring = claims.exp.is_some(),
        "Session token issued"
    );

    Ok(token)
}

/// Verify a session token and return its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` for every verification failure.
#[instrument(skip_all, name = "auth.services.verify_token")]
pub fn verify_session_token(
    token: &str,
    secret: &SecretString,
    require_expiry: bool,
) -> Result<SessionClaims, AuthError> {
    match jwt::verify_session_token(token, secret, require_expiry) {
        Ok(claims) => {
            record_token_verification("valid");
            Ok(claims)
        }
        Err(e) => {
            tracing::debug!(target: "auth.services.token", error = ?e, "Session token rejected");
            record_token_verification("invalid");
            Err(AuthError::InvalidToken(e.to_string()))
        }
    }
}
