//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! IngressConfig
//!     → transport.rs (TransportConfig, plain or TLS)
//!     → tls.rs (certificate + key read and checked, https only)
//!     → Transport wrapping the Router
//!
//! Startup sequencer
//!     → Transport::bind (listener.rs, the provisioned host:port)
//!     → Transport::serve(BoundListener)
//! ```
//!
//! # Design Decisions
//! - TLS material is read once, before any listener accepts traffic
//! - A bad certificate aborts startup; there is no plain fallback

pub mod listener;
pub mod tls;
pub mod transport;

pub use listener::{BoundListener, ListenerError, ListenerState};
pub use transport::{provision, Transport, TransportConfig, TransportError};
