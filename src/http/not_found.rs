//! Terminal responder for requests that matched no route.

use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::error::{EnvelopeMessage, ErrorEnvelope};
use crate::observability::metrics;

/// Body of the not-found response for `method` and `target` (path plus query).
pub fn not_found_envelope(method: &Method, target: &str) -> ErrorEnvelope<Vec<String>> {
    ErrorEnvelope {
        status: StatusCode::NOT_FOUND.as_u16(),
        error: "Not Found".to_string(),
        response: EnvelopeMessage {
            message: vec![format!(
                "Cannot {} {}",
                method.as_str().to_uppercase(),
                target
            )],
        },
    }
}

/// Router fallback. Makes no external calls.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    tracing::debug!(method = %method, target = %target, "No route matched");
    metrics::record_not_found();

    (StatusCode::NOT_FOUND, Json(not_found_envelope(&method, target))).into_response()
}
