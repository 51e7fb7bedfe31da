//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured host and port
//! - Report the listener's lifecycle state
//! - Hand the bound socket to the transport
//!
//! # States
//! ```text
//! Unbound → Binding → Bound → Failed
//!                   ↘ Failed
//! ```
//! There is no transition back from `Bound`.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Listener lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Nothing bound yet.
    Unbound,
    /// Bind in progress.
    Binding,
    /// Bound and serving.
    Bound,
    /// Bind failed, or the server stopped with an error. Fatal.
    Failed,
}

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address (in use, no privilege, bad host).
    #[error("Failed to bind {host}:{port}: {source}")]
    Bind {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// A socket bound to the configured address, not yet serving.
#[derive(Debug)]
pub struct BoundListener {
    inner: std::net::TcpListener,
    local_addr: SocketAddr,
}

impl BoundListener {
    /// Bind to `host:port`.
    pub async fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let bind_error = |source| ListenerError::Bind {
            host: host.to_string(),
            port,
            source,
        };

        let listener = TcpListener::bind((host, port)).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;
        let inner = listener.into_std().map_err(bind_error)?;

        tracing::debug!(address = %local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Non-blocking std listener, ready for the server.
    pub fn into_std(self) -> std::net::TcpListener {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let listener = BoundListener::bind("127.0.0.1", 0).await.unwrap();
        assert_ne!(listener.local_addr().port(), 0);
        assert!(listener.local_addr().ip().is_loopback());
    }

    #[tokio::test]
    async fn port_in_use_fails() {
        let first = BoundListener::bind("127.0.0.1", 0).await.unwrap();
        let port = first.local_addr().port();

        let err = BoundListener::bind("127.0.0.1", port).await.unwrap_err();
        let ListenerError::Bind { port: failed, .. } = err;
        assert_eq!(failed, port);
    }
}
