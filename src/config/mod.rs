//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → IngressConfig (validated, immutable)
//!     → shared via Arc to the origin gate, failure interceptor,
//!       transport provisioner and startup sequencer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::IngressConfig;
pub use schema::{
    CorsConfig, ProvisioningConfig, ServerConfig, SslConfig, TransportKind, WebhookConfig,
};
