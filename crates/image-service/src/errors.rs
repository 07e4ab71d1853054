use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced by the image service HTTP handlers.
///
/// Responses carry only a status code. A bad nonce and a missing file are
/// both `NotFound` so callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImageError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImageError::Unauthorized => StatusCode::UNAUTHORIZED,
            ImageError::NotFound => StatusCode::NOT_FOUND,
            ImageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        if let ImageError::Internal(reason) = &self {
            tracing::error!(target: "image.errors", reason = %reason, "Request failed with internal error");
        }

        self.status_code().into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(ImageError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ImageError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ImageError::Internal("auth service unreachable".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_responses_have_empty_bodies() {
        for error in [
            ImageError::Unauthorized,
            ImageError::NotFound,
            ImageError::Internal("connection refused".to_string()),
        ] {
            let response = error.into_response();
            let body = response.into_body().collect().await.unwrap().to_bytes();
            assert!(body.is_empty());
        }
    }
}
