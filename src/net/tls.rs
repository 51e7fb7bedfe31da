//! TLS configuration and certificate loading.

use std::io;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

/// Error type for TLS material loading.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read {what} file {path:?}: {source}")]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed PEM in {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no certificate found in {0:?}")]
    NoCertificate(PathBuf),

    #[error("no private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("certificate and key rejected: {0}")]
    Rejected(#[source] io::Error),
}

/// PEM bytes read from disk and checked to contain what they should.
#[derive(Clone)]
pub struct TlsMaterial {
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
}

impl std::fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("cert_pem_len", &self.cert_pem.len())
            .finish_non_exhaustive()
    }
}

/// Read certificate chain and private key synchronously.
///
/// Fails if either file is missing, unreadable, or does not hold a
/// certificate / private key.
pub fn read_tls_material(cert_path: &Path, key_path: &Path) -> Result<TlsMaterial, TlsError> {
    let cert_pem = std::fs::read(cert_path).map_err(|source| TlsError::Read {
        what: "certificate",
        path: cert_path.to_path_buf(),
        source,
    })?;
    let key_pem = std::fs::read(key_path).map_err(|source| TlsError::Read {
        what: "private key",
        path: key_path.to_path_buf(),
        source,
    })?;

    let certs = rustls_pemfile::certs(&mut cert_pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Malformed {
            path: cert_path.to_path_buf(),
            source,
        })?;
    if certs.is_empty() {
        return Err(TlsError::NoCertificate(cert_path.to_path_buf()));
    }

    let key = rustls_pemfile::private_key(&mut key_pem.as_slice()).map_err(|source| {
        TlsError::Malformed {
            path: key_path.to_path_buf(),
            source,
        }
    })?;
    if key.is_none() {
        return Err(TlsError::NoPrivateKey(key_path.to_path_buf()));
    }

    Ok(TlsMaterial { cert_pem, key_pem })
}

impl TlsMaterial {
    /// Build the rustls server configuration.
    pub async fn into_rustls_config(self) -> Result<RustlsConfig, TlsError> {
        RustlsConfig::from_pem(self.cert_pem, self.key_pem)
            .await
            .map_err(TlsError::Rejected)
    }
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    read_tls_material(cert_path, key_path)?
        .into_rustls_config()
        .await
}
