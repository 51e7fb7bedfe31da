//! Outbound failure notification.
//!
//! # Data Flow
//! ```text
//! failure interceptor
//!     → webhook.rs (gate check, build OutboundErrorEvent, log)
//!     → detached tokio task POSTs to the target
//!     → outcome logged, never retried
//! ```

pub mod webhook;

pub use webhook::{ErrorNotifier, OutboundErrorEvent, WebhookGate};
