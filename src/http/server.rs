//! HTTP pipeline assembly.
//!
//! # Responsibilities
//! - Merge the domain routes with the terminal not-found responder
//! - Wire up middleware (tracing, request ID, compression, failure
//!   interceptor, panic capture, origin gate, body limit)
//! - Produce a transport-agnostic `Router` handed to the transport provisioner
//!
//! # Layer order (outermost first)
//! ```text
//! TraceLayer → SetRequestId → PropagateRequestId → Compression
//!     → failure_interceptor → CatchPanic → origin_gate → refuse_oversized
//!     → RequestBodyLimit → routes | not_found
//! ```

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::IngressConfig;
use crate::http::middleware::body_limit::refuse_oversized;
use crate::http::middleware::interceptor::{failure_interceptor, handle_panic};
use crate::http::middleware::origin::{origin_gate, OriginPolicy};
use crate::http::not_found::not_found;
use crate::http::request::MakeRequestUuidV4;
use crate::notify::ErrorNotifier;

/// Build the request-handling entry point.
///
/// `routes` are the domain routes; they must not install their own fallback.
pub fn build_app(config: &IngressConfig, notifier: Arc<ErrorNotifier>, routes: Router) -> Router {
    let policy = Arc::new(OriginPolicy::from_config(&config.cors));

    routes
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .layer(middleware::from_fn(refuse_oversized))
        .layer(middleware::from_fn_with_state(policy, origin_gate))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(notifier, failure_interceptor))
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
        .layer(TraceLayer::new_for_http())
}
