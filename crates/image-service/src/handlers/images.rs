//! Nonce-gated resource fetch.

use crate::errors::ImageError;
use crate::observability::metrics::record_resource_fetch;
use crate::routes::AppState;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Default, Deserialize)]
pub struct NonceQuery {
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Handler for GET /images/*path
///
/// The nonce is consumed before the path is looked at, so every attempt
/// burns it. A missing nonce, a bad nonce, a rejected path and a missing
/// file all answer 404.
#[instrument(skip_all, name = "image.handlers.images")]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<NonceQuery>, QueryRejection>,
) -> Result<Response, ImageError> {
    let nonce = query
        .ok()
        .and_then(|Query(q)| q.nonce)
        .filter(|n| !n.is_empty());

    let Some(nonce) = nonce else {
        tracing::debug!(target: "image.handlers.images", "Missing nonce");
        record_resource_fetch("missing_nonce");
        return Err(ImageError::NotFound);
    };

    if !state.nonces.validate_and_consume(&nonce) {
        record_resource_fetch("invalid_nonce");
        return Err(ImageError::NotFound);
    }

    let Ok(Path(relative)) = path else {
        record_resource_fetch("not_found");
        return Err(ImageError::NotFound);
    };

    let Some(resource) = state.resources.fetch(&relative).await else {
        record_resource_fetch("not_found");
        return Err(ImageError::NotFound);
    };

    record_resource_fetch("served");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(resource.content_type)),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        resource.bytes,
    )
        .into_response())
}
