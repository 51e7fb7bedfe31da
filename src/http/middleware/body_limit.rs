//! Body limit refusal.
//!
//! `RequestBodyLimitLayer` answers an oversized declared length with its own
//! plain-text 413, and a handler reading past the limit gets an extractor
//! rejection with the same status. Both are turned into a failure here so
//! they reach the interceptor like any other.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::{ApiError, FailureRecord};

/// Message carried by a body limit refusal.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "request entity too large";

/// Middleware: wrap the body limit layer and report its refusals as failures.
pub async fn refuse_oversized(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.status() != StatusCode::PAYLOAD_TOO_LARGE
        || response.extensions().get::<FailureRecord>().is_some()
    {
        return response;
    }

    tracing::debug!("Request body over limit");
    ApiError::message(PAYLOAD_TOO_LARGE_MESSAGE)
        .with_status(StatusCode::PAYLOAD_TOO_LARGE.as_u16())
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/bare", get(|| async { StatusCode::PAYLOAD_TOO_LARGE }))
            .route(
                "/reported",
                get(|| async { Err::<(), _>(ApiError::message("custom").with_status(413)) }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(middleware::from_fn(refuse_oversized))
    }

    async fn record_for(uri: &str) -> Option<FailureRecord> {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.extensions().get::<FailureRecord>().cloned()
    }

    #[tokio::test]
    async fn bare_413_becomes_failure() {
        let record = record_for("/bare").await.unwrap();
        assert_eq!(record.status, 413);
        assert_eq!(record.message, PAYLOAD_TOO_LARGE_MESSAGE);
        assert_eq!(record.error, "Internal Server Error");
    }

    #[tokio::test]
    async fn existing_failure_is_kept() {
        let record = record_for("/reported").await.unwrap();
        assert_eq!(record.message, "custom");
    }

    #[tokio::test]
    async fn other_responses_untouched() {
        assert!(record_for("/ok").await.is_none());
    }
}
