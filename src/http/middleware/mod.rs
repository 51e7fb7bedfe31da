//! Request pipeline middleware.

pub mod body_limit;
pub mod interceptor;
pub mod origin;

pub use body_limit::refuse_oversized;
pub use interceptor::{failure_interceptor, handle_panic};
pub use origin::{origin_gate, OriginPolicy};
