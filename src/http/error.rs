//! Per-request failure types and the client-facing error envelope.
//!
//! Handlers and middleware return [`ApiError`]. Its `IntoResponse` impl does
//! not render anything the client sees: it parks a [`FailureRecord`] in the
//! response extensions, and the failure interceptor turns that into the final
//! envelope (and the optional webhook notification) exactly once.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Default status for failures that carry none.
pub const DEFAULT_STATUS: u16 = 500;

/// Default `error` and `message` text.
pub const DEFAULT_ERROR: &str = "Internal Server Error";

/// A failure raised somewhere in the request pipeline.
///
/// Every field is optional; missing ones are filled by [`ApiError::record`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ApiError {
    /// A failure with nothing attached; resolves to all defaults.
    pub fn internal() -> Self {
        Self::default()
    }

    /// A failure with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Coerce into a fully populated record.
    ///
    /// A zero or out-of-range status and empty strings count as missing.
    pub fn record(&self) -> FailureRecord {
        let status = self
            .status
            .filter(|s| StatusCode::from_u16(*s).is_ok())
            .unwrap_or(DEFAULT_STATUS);

        FailureRecord {
            status,
            error: non_empty(self.error.as_deref()),
            message: non_empty(self.message.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DEFAULT_ERROR.to_string(),
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record = self.record();
        write!(f, "{} {}: {}", record.status, record.error, record.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let record = self.record();
        let mut response = StatusCode::from_u16(record.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
        response.extensions_mut().insert(record);
        response
    }
}

/// Normalized failure. Never has a missing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl FailureRecord {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The JSON body sent to the client.
    pub fn envelope(&self) -> ErrorEnvelope<String> {
        ErrorEnvelope {
            status: self.status,
            error: self.error.clone(),
            response: EnvelopeMessage {
                message: self.message.clone(),
            },
        }
    }
}

/// `{ status, error, response: { message } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope<M> {
    pub status: u16,
    pub error: String,
    pub response: EnvelopeMessage<M>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMessage<M> {
    pub message: M,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_failure_gets_all_defaults() {
        let record = ApiError::internal().record();
        assert_eq!(
            record,
            FailureRecord {
                status: 500,
                error: "Internal Server Error".into(),
                message: "Internal Server Error".into(),
            }
        );
    }

    #[test]
    fn each_missing_field_is_filled_independently() {
        let only_status = ApiError::default().with_status(403).record();
        assert_eq!(only_status.status, 403);
        assert_eq!(only_status.error, DEFAULT_ERROR);
        assert_eq!(only_status.message, DEFAULT_ERROR);

        let only_error = ApiError::default().with_error("Bad Request").record();
        assert_eq!(only_error.status, 500);
        assert_eq!(only_error.error, "Bad Request");
        assert_eq!(only_error.message, DEFAULT_ERROR);

        let only_message = ApiError::message("boom").record();
        assert_eq!(only_message.status, 500);
        assert_eq!(only_message.error, DEFAULT_ERROR);
        assert_eq!(only_message.message, "boom");
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let record = ApiError {
            status: Some(0),
            error: Some(String::new()),
            message: Some(String::new()),
        }
        .record();
        assert_eq!(record, ApiError::internal().record());
    }

    #[test]
    fn invalid_status_falls_back_to_500() {
        let record = ApiError::message("x").with_status(1234).record();
        assert_eq!(record.status, 500);
        assert_eq!(record.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn envelope_never_contains_null() {
        let body = serde_json::to_value(ApiError::internal().record().envelope()).unwrap();
        assert_eq!(
            body,
            json!({
                "status": 500,
                "error": "Internal Server Error",
                "response": { "message": "Internal Server Error" }
            })
        );
    }

    #[test]
    fn into_response_parks_record() {
        let response = ApiError::message("blocked").with_status(403).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let record = response.extensions().get::<FailureRecord>().unwrap();
        assert_eq!(record.message, "blocked");
        assert_eq!(record.error, DEFAULT_ERROR);
    }
}
