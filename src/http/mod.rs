//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → request.rs (request ID)
//!     → middleware/origin.rs (origin gate, preflight)
//!     → [domain routes]
//!     → on failure: middleware/interceptor.rs (envelope + webhook)
//!     → on no match: not_found.rs
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod not_found;
pub mod request;
pub mod server;
pub mod status;

pub use error::{ApiError, FailureRecord};
pub use request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
pub use server::build_app;
