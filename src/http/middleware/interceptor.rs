//! Failure interceptor.
//!
//! The last stage a failing request passes through. Inner stages report a
//! failure by returning [`ApiError`](crate::http::error::ApiError), which
//! leaves a [`FailureRecord`] in the response extensions. This middleware
//! takes that record out, relays it to the webhook when configured and
//! writes the client envelope. Responses without a record pass untouched.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::error::{ApiError, FailureRecord};
use crate::http::request::RequestIdExt;
use crate::notify::ErrorNotifier;
use crate::observability::metrics;

/// Middleware: normalize failures into the error envelope, exactly once.
pub async fn failure_interceptor(
    State(notifier): State<Arc<ErrorNotifier>>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request.request_id();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let Some(record) = response.extensions_mut().remove::<FailureRecord>() else {
        return response;
    };

    tracing::warn!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = record.status,
        error = %record.error,
        message = %record.message,
        "Request failed"
    );
    metrics::record_failure(record.status);

    // Detached; the response below does not wait for delivery.
    notifier.notify(&record, &request_id);

    render(record, response)
}

/// Replace the placeholder body with the envelope, keeping headers set by
/// inner stages.
fn render(record: FailureRecord, placeholder: Response) -> Response {
    let (parts, _) = placeholder.into_parts();
    let mut response = (record.status_code(), Json(record.envelope())).into_response();

    for (name, value) in parts.headers.iter() {
        if *name == header::CONTENT_TYPE || *name == header::CONTENT_LENGTH {
            continue;
        }
        response.headers_mut().append(name.clone(), value.clone());
    }

    response
}

/// Turns a handler panic into a failure with no fields, so it reaches the
/// interceptor like any other failure.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    ApiError::internal().into_response()
}
