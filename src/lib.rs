//! HTTP ingress pipeline: origin gate, failure interception with webhook
//! relay, not-found handling, and plain/TLS transport provisioning.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod notify;
pub mod observability;

pub use config::IngressConfig;
pub use http::build_app;
pub use lifecycle::StartupSequencer;
