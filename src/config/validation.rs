//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the selected transport has what it needs
//! - Check URLs and method tokens
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: IngressConfig → Result<(), Vec<ValidationError>>
//! - Never touches the filesystem; TLS files are read when the transport is built

use axum::http::Method;
use thiserror::Error;
use url::Url;

use crate::config::schema::{IngressConfig, TransportKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.kind is https but ssl.{0} is empty")]
    MissingTlsPath(&'static str),

    #[error("webhook.events.errors_webhook is not an absolute URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("provisioning.endpoint is not a valid URL: {0}")]
    InvalidProvisioningEndpoint(String),

    #[error("cors.methods contains an invalid method: {0}")]
    InvalidMethod(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &IngressConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.kind == TransportKind::Https {
        if config.ssl.fullchain.trim().is_empty() {
            errors.push(ValidationError::MissingTlsPath("fullchain"));
        }
        if config.ssl.privkey.trim().is_empty() {
            errors.push(ValidationError::MissingTlsPath("privkey"));
        }
    }

    let target = &config.webhook.events.errors_webhook;
    if !target.is_empty() && Url::parse(target).is_err() {
        errors.push(ValidationError::InvalidWebhookUrl(target.clone()));
    }

    if Url::parse(&config.provisioning.endpoint).is_err() {
        errors.push(ValidationError::InvalidProvisioningEndpoint(
            config.provisioning.endpoint.clone(),
        ));
    }

    for method in &config.cors.methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
