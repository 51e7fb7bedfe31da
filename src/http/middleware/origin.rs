//! Origin gate.
//! Admits requests whose declared origin is on the allow-list.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;
use crate::http::error::ApiError;
use crate::observability::metrics;

const WILDCARD: &str = "*";

/// Message carried by a rejection. Surfaces as a generic 500.
pub const REJECTION_MESSAGE: &str = "Not allowed by CORS";

/// Process-wide origin policy, read on every request.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed_origins: HashSet<String>,
    allowed_methods: Vec<String>,
    allow_credentials: bool,
}

impl OriginPolicy {
    pub fn new<I, S>(origins: I, methods: Vec<String>, allow_credentials: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
            allowed_methods: methods,
            allow_credentials,
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.origin.iter().cloned(), config.methods.clone(), config.credentials)
    }

    /// Decide whether a declared origin is admitted.
    ///
    /// An absent origin is not on any list; only the wildcard admits it.
    pub fn admits(&self, origin: Option<&str>) -> bool {
        if self.allowed_origins.contains(WILDCARD) {
            return true;
        }

        match origin {
            Some(origin) => self.allowed_origins.contains(origin),
            None => false,
        }
    }

    pub fn allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    /// Allowed methods joined in configured order, e.g. `POST,GET`.
    pub fn methods_header(&self) -> String {
        self.allowed_methods.join(",")
    }

    /// Add the negotiation headers for an admitted request.
    fn decorate(&self, headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
        if let Some(origin) = origin {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }

        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }

        if let Ok(methods) = HeaderValue::from_str(&self.methods_header()) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods);
        }
    }
}

/// Every admitted `OPTIONS` is answered here, with or without
/// `Access-Control-Request-Method`; none reaches the routes.
fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
}

/// Middleware: reject disallowed origins, answer preflights, decorate the rest.
pub async fn origin_gate(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let declared = origin.as_ref().and_then(|v| v.to_str().ok());

    if !policy.admits(declared) {
        tracing::debug!(origin = ?declared, "Origin rejected");
        metrics::record_origin_rejection();
        return ApiError::message(REJECTION_MESSAGE).into_response();
    }

    if is_preflight(&request) {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        policy.decorate(headers, origin.as_ref());
        if let Some(requested) = request
            .headers()
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
            headers.append(
                header::VARY,
                HeaderValue::from_static("Access-Control-Request-Headers"),
            );
        }
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        return response;
    }

    let mut response = next.run(request).await;
    policy.decorate(response.headers_mut(), origin.as_ref());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::FailureRecord;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn policy(origins: &[&str]) -> OriginPolicy {
        OriginPolicy::new(
            origins.iter().copied(),
            vec!["POST".into(), "GET".into()],
            true,
        )
    }

    fn app(policy: OriginPolicy) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(Arc::new(policy), origin_gate))
    }

    #[test]
    fn wildcard_admits_everything() {
        let p = policy(&["https://a.example", "*"]);
        assert!(p.admits(Some("https://evil.example")));
        assert!(p.admits(Some("")));
        assert!(p.admits(None));
    }

    #[test]
    fn list_admits_members_only() {
        let p = policy(&["https://a.example", "https://b.example"]);
        assert!(p.admits(Some("https://a.example")));
        assert!(p.admits(Some("https://b.example")));
        assert!(!p.admits(Some("https://c.example")));
        assert!(!p.admits(Some("https://a.example:443")));
        assert!(!p.admits(None));
    }

    #[test]
    fn empty_list_admits_nothing() {
        let p = policy(&[]);
        assert!(!p.admits(Some("https://a.example")));
        assert!(!p.admits(None));
    }

    #[test]
    fn methods_keep_configured_order() {
        let p = OriginPolicy::new(["*"], vec!["DELETE".into(), "GET".into()], false);
        assert_eq!(p.methods_header(), "DELETE,GET");
        assert!(!p.allow_credentials());
    }

    #[tokio::test]
    async fn admitted_response_carries_negotiation_headers() {
        let response = app(policy(&["https://a.example"]))
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "https://a.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "https://a.example");
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-methods"], "POST,GET");
    }

    #[tokio::test]
    async fn rejected_origin_becomes_generic_failure() {
        let response = app(policy(&["https://a.example"]))
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let record = response.extensions().get::<FailureRecord>().unwrap();
        assert_eq!(record.status, 500);
        assert_eq!(record.message, REJECTION_MESSAGE);
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn preflight_is_answered_by_the_gate() {
        let response = app(policy(&["*"]))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .header("origin", "https://a.example")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type,apikey")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-methods"], "POST,GET");
        assert_eq!(headers["access-control-allow-headers"], "content-type,apikey");
        assert_eq!(headers["access-control-allow-origin"], "https://a.example");
    }

    #[tokio::test]
    async fn bare_options_is_answered_by_the_gate() {
        let response = app(policy(&["https://a.example"]))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/unrouted")
                    .header("origin", "https://a.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-methods"], "POST,GET");
        assert!(headers.get("access-control-allow-headers").is_none());
    }

    #[tokio::test]
    async fn options_from_rejected_origin_is_refused() {
        let response = app(policy(&["https://a.example"]))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .header("origin", "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<FailureRecord>().is_some());
    }
}
