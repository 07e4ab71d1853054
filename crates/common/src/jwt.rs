//! Session token utilities.
//!
//! Session tokens are HS256 JWTs signed with a secret shared by whoever
//! issues and verifies them. The claims carry the caller's `username` and an
//! opaque `details` payload; the password is never embedded.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS256 is accepted; `alg` confusion is rejected by `jsonwebtoken`
//! - Error messages are generic; the precise reason is logged at debug level
//! - `username` and `details` are redacted in Debug output
//!
//! # Expiry
//!
//! Tokens carry no `exp` claim unless the issuer is configured with a TTL.
//! Verifiers that run with `require_expiry = false` accept both shapes and
//! still reject a token whose `exp` has passed.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens above this size are rejected before any base64 decoding or HMAC
/// work is done.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// The only algorithm used to sign and verify session tokens.
pub const SESSION_TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Clock skew tolerance applied to `exp`, in seconds.
///
/// Zero: a token is rejected as soon as its `exp` passes.
pub const EXPIRY_LEEWAY_SECONDS: u64 = 0;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during session token verification.
///
/// All variants share one client-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// No token was presented.
    #[error("The session token is invalid or expired")]
    MissingToken,

    /// Token size exceeds maximum allowed.
    #[error("The session token is invalid or expired")]
    TokenTooLarge,

    /// Token is not a structurally valid JWT, or its claims do not parse.
    #[error("The session token is invalid or expired")]
    MalformedToken,

    /// Signature does not match the shared secret.
    #[error("The session token is invalid or expired")]
    InvalidSignature,

    /// Token carries an `exp` claim in the past, or lacks one when required.
    #[error("The session token is invalid or expired")]
    Expired,
}

/// Errors that can occur while signing a session token.
#[derive(Error, Debug)]
pub enum JwtSigningError {
    #[error("Failed to sign session token: {0}")]
    Signing(String),
}

// =============================================================================
// Claims Types
// =============================================================================

/// Claims embedded in a session token.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the token was issued to - redacted in Debug output.
    pub username: String,

    /// Opaque user-profile payload from the credential record - redacted in
    /// Debug output.
    pub details: serde_json::Value,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Optional expiration timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("username", &"[REDACTED]")
            .field("details", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl SessionClaims {
    /// Build claims issued now, expiring after `ttl` if one is given.
    #[must_use]
    pub fn issue_now(username: String, details: serde_json::Value, ttl: Option<Duration>) -> Self {
        let iat = Utc::now().timestamp();
        let exp = ttl.map(|ttl| {
            let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            iat.saturating_add(secs)
        });

        Self {
            username,
            details,
            iat,
            exp,
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Sign `claims` into a compact HS256 JWT.
///
/// # Errors
///
/// Returns `JwtSigningError::Signing` if the claims cannot be serialized.
pub fn sign_session_token(
    claims: &SessionClaims,
    secret: &SecretString,
) -> Result<String, JwtSigningError> {
    let mut header = Header::new(SESSION_TOKEN_ALGORITHM);
    header.typ = Some("JWT".to_string());

    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtSigningError::Signing(e.to_string()))
}

/// Verify a session token and return its claims.
///
/// # Security Checks
///
/// 1. Empty token rejected
/// 2. Size check before parsing
/// 3. Three-segment structure
/// 4. HS256 signature against `secret`
/// 5. `exp` validated when present; required when `require_expiry` is set
///
/// # Errors
///
/// Returns a `JwtValidationError` variant describing the failure. All
/// variants render the same message.
pub fn verify_session_token(
    token: &str,
    secret: &SecretString,
    require_expiry: bool,
) -> Result<SessionClaims, JwtValidationError> {
    if token.is_empty() {
        return Err(JwtValidationError::MissingToken);
    }

    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let parts = token.split('.').count();
    if parts != 3 {
        tracing::debug!(target: "common.jwt", parts, "Token rejected: invalid JWT format");
        return Err(JwtValidationError::MalformedToken);
    }

    let mut validation = Validation::new(SESSION_TOKEN_ALGORITHM);
    validation.validate_exp = true;
    validation.leeway = EXPIRY_LEEWAY_SECONDS;
    if require_expiry {
        validation.set_required_spec_claims(&["exp"]);
    } else {
        validation.set_required_spec_claims::<&str>(&[]);
    }

    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Token verification failed");
        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::InvalidSignature,
            ErrorKind::ExpiredSignature | ErrorKind::MissingRequiredClaim(_) => {
                JwtValidationError::Expired
            }
            _ => JwtValidationError::MalformedToken,
        }
    })?;

    Ok(token_data.claims)
}

/// Extract the token from an `Authorization` header value.
///
/// Both `Bearer <token>` and a bare `<token>` are accepted. Returns `None`
/// when nothing but whitespace remains.
#[must_use]
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let trimmed = header_value.trim();
    let token = match trimmed.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if trimmed.eq_ignore_ascii_case("bearer") => "",
        _ => trimmed,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

// =============================================================================
// Tests
// =============================================================================
