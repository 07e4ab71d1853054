use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced by the auth service HTTP handlers.
///
/// Responses carry only a status code. The inner strings are for server-side
/// logs and never reach the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AuthError::Internal(reason) = &self {
            tracing::error!(target: "auth.errors", reason = %reason, "Request failed with internal error");
        }

        let mut response = status.into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"auth-service\""),
            );
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_len(response: Response) -> usize {
        response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes()
            .len()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::BadRequest("missing field".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidToken("bad".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_credentials_has_empty_body() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
        assert_eq!(body_len(response).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_token_sets_www_authenticate() {
        let response = AuthError::InvalidToken("signature mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let challenge = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .expect("401 should carry a challenge")
            .to_str()
            .unwrap();
        assert!(challenge.starts_with("Bearer"));
        assert_eq!(body_len(response).await, 0);
    }

    #[tokio::test]
    async fn test_internal_error_does_not_leak_reason() {
        let response = AuthError::Internal("users file vanished".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_len(response).await, 0);
    }
}
