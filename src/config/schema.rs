//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the ingress.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the ingress pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IngressConfig {
    /// Server transport, bind port and public URL.
    pub server: ServerConfig,

    /// TLS certificate material (used only by the `https` transport).
    pub ssl: SslConfig,

    /// Origin policy applied to every request.
    pub cors: CorsConfig,

    /// Error webhook notification settings.
    pub webhook: WebhookConfig,

    /// Global API key.
    pub authentication: AuthConfig,

    /// Message queue attachment.
    pub rabbitmq: RabbitmqConfig,

    /// Deferred instance provisioning call made after bind.
    pub provisioning: ProvisioningConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Transport discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Plain, unencrypted HTTP.
    #[default]
    Http,
    /// TLS-terminated HTTPS.
    Https,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Http => "http",
            TransportKind::Https => "https",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Which transport to provision.
    pub kind: TransportKind,

    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Public URL of this server, reported in error notifications.
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Http,
            host: "0.0.0.0".to_string(),
            port: 8080,
            url: "http://localhost:8080".to_string(),
        }
    }
}

/// TLS material locations. Files are read at transport construction, not here.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SslConfig {
    /// Path to the certificate chain (PEM).
    pub fullchain: String,

    /// Path to the private key (PEM).
    pub privkey: String,
}

/// Origin policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows every origin.
    pub origin: Vec<String>,

    /// Allowed methods, in the order they are advertised.
    pub methods: Vec<String>,

    /// Whether credentials are allowed.
    pub credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origin: vec!["*".to_string()],
            methods: ["POST", "GET", "PUT", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            credentials: true,
        }
    }
}

/// Webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebhookConfig {
    /// Webhook subsystem switch.
    pub enabled: bool,

    pub events: WebhookEventsConfig,
}

/// Per-event webhook switches.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebhookEventsConfig {
    /// Deliver error events.
    pub errors: bool,

    /// Target URL for error events.
    pub errors_webhook: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RabbitmqConfig {
    pub enabled: bool,
}

/// Deferred provisioning call configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Endpoint receiving the instance creation request.
    pub endpoint: String,

    /// Delay after bind before the call is made, in seconds.
    pub delay_secs: u64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Environment variable holding the service name.
    pub service_name_env: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/instance/create".to_string(),
            delay_secs: 3,
            timeout_secs: 60,
            service_name_env: "SERVICE_NAME".to_string(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 136 * 1024 * 1024, // 136MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_uses_defaults() {
        let config: IngressConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.kind, TransportKind::Http);
        assert_eq!(config.cors.origin, vec!["*"]);
        assert_eq!(config.provisioning.delay_secs, 3);
        assert_eq!(config.provisioning.timeout_secs, 60);
        assert_eq!(config.limits.max_body_bytes, 136 * 1024 * 1024);
        assert!(!config.webhook.enabled);
    }

    #[test]
    fn transport_kind_is_lowercase() {
        let config: IngressConfig = toml::from_str(
            r#"
            [server]
            kind = "https"

            [ssl]
            fullchain = "/etc/ssl/fullchain.pem"
            privkey = "/etc/ssl/privkey.pem"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.kind, TransportKind::Https);
        assert_eq!(config.server.kind.to_string(), "https");
        assert_eq!(config.ssl.privkey, "/etc/ssl/privkey.pem");
    }
}
