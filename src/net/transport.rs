//! Transport provisioning.
//!
//! # Responsibilities
//! - Pick plain or TLS transport from the configured kind
//! - Load TLS material up front and fail fast when it is unusable
//! - Serve a request-handling `Router` on a bound listener
//!
//! # Design Decisions
//! - The `Router` is passed in; nothing global holds it
//! - No fallback from TLS to plain when certificates are bad

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::{IngressConfig, TransportKind};
use crate::net::listener::{BoundListener, ListenerError};
use crate::net::tls::{read_tls_material, TlsError};

/// The values the provisioner consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Selects which transport is built.
    pub kind: TransportKind,
    pub host: String,
    pub port: u16,
    /// Certificate chain, read only for `https`.
    pub certificate_path: PathBuf,
    /// Private key, read only for `https`.
    pub private_key_path: PathBuf,
}

impl TransportConfig {
    pub fn from_config(config: &IngressConfig) -> Self {
        Self {
            kind: config.server.kind,
            host: config.server.host.clone(),
            port: config.server.port,
            certificate_path: PathBuf::from(&config.ssl.fullchain),
            private_key_path: PathBuf::from(&config.ssl.privkey),
        }
    }

    pub fn plain(host: impl Into<String>, port: u16) -> Self {
        Self {
            kind: TransportKind::Http,
            host: host.into(),
            port,
            certificate_path: PathBuf::new(),
            private_key_path: PathBuf::new(),
        }
    }

    pub fn tls(
        host: impl Into<String>,
        port: u16,
        certificate_path: impl Into<PathBuf>,
        private_key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: TransportKind::Https,
            host: host.into(),
            port,
            certificate_path: certificate_path.into(),
            private_key_path: private_key_path.into(),
        }
    }
}

/// Error type for transport construction. Always fatal at startup.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot provision https transport: {0}")]
    Tls(#[from] TlsError),
}

/// A listener-ready transport wrapping the request-handling entry point.
pub struct Transport {
    host: String,
    port: u16,
    app: Router,
    tls: Option<RustlsConfig>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("kind", &self.kind())
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Transport {
    pub fn kind(&self) -> TransportKind {
        if self.tls.is_some() {
            TransportKind::Https
        } else {
            TransportKind::Http
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Bind the address this transport was provisioned for.
    pub async fn bind(&self) -> Result<BoundListener, ListenerError> {
        BoundListener::bind(&self.host, self.port).await
    }

    /// Serve connections from `listener` until the server stops.
    pub async fn serve(self, listener: BoundListener) -> Result<(), std::io::Error> {
        let listener = listener.into_std();
        let service = self.app.into_make_service_with_connect_info::<SocketAddr>();
        match self.tls {
            None => axum_server::from_tcp(listener).serve(service).await,
            Some(tls) => axum_server::from_tcp_rustls(listener, tls).serve(service).await,
        }
    }
}

/// Build the transport selected by `config.kind` around `app`.
///
/// For `https` the certificate and key are read here, synchronously, and any
/// problem is returned instead of falling back to plain HTTP. For `http` the
/// TLS paths are never touched.
pub async fn provision(config: &TransportConfig, app: Router) -> Result<Transport, TransportError> {
    let tls = match config.kind {
        TransportKind::Http => None,
        TransportKind::Https => {
            let material = read_tls_material(&config.certificate_path, &config.private_key_path)?;
            let tls = material.into_rustls_config().await?;
            tracing::info!(
                certificate = ?config.certificate_path,
                "TLS material loaded"
            );
            Some(tls)
        }
    };

    Ok(Transport {
        host: config.host.clone(),
        port: config.port,
        app,
        tls,
    })
}
