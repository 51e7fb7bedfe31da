//! Deferred instance provisioning.
//!
//! One best-effort POST made a fixed delay after the listener binds. Skipped
//! when no service name is available; failures are logged, never retried.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::IngressConfig;
use crate::observability::metrics;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("provisioning request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Body of the instance creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCreateRequest {
    pub instance_name: String,
    pub token: String,
    pub qrcode: bool,
}

/// Read the service name from `var`. Unset and empty both mean none.
pub fn service_name_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|name| !name.is_empty())
}

/// A scheduled-once call to the provisioning endpoint.
#[derive(Debug, Clone)]
pub struct ProvisioningCall {
    endpoint: String,
    api_key: String,
    service_name: String,
    delay: Duration,
    timeout: Duration,
}

impl ProvisioningCall {
    /// `None` when there is no (non-empty) service name.
    pub fn from_config(config: &IngressConfig, service_name: Option<String>) -> Option<Self> {
        let service_name = service_name.filter(|name| !name.is_empty())?;

        Some(Self {
            endpoint: config.provisioning.endpoint.clone(),
            api_key: config.authentication.api_key.clone(),
            service_name,
            delay: Duration::from_secs(config.provisioning.delay_secs),
            timeout: Duration::from_secs(config.provisioning.timeout_secs),
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The instance name and token are both the service name.
    pub fn request_body(&self) -> InstanceCreateRequest {
        InstanceCreateRequest {
            instance_name: self.service_name.clone(),
            token: self.service_name.clone(),
            qrcode: true,
        }
    }

    /// Make the call now.
    pub async fn execute(&self, client: &reqwest::Client) -> Result<(), ProvisioningError> {
        client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(&self.request_body())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Run the call on a detached task after the configured delay.
    pub fn schedule(self, client: reqwest::Client) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(self.delay).await;

            tracing::info!(
                service_name = %self.service_name,
                endpoint = %self.endpoint,
                "Provisioning instance"
            );

            match self.execute(&client).await {
                Ok(()) => {
                    tracing::info!(service_name = %self.service_name, "Provisioning call succeeded");
                    metrics::record_provisioning(true);
                }
                Err(e) => {
                    tracing::error!(service_name = %self.service_name, error = %e, "Provisioning call failed");
                    metrics::record_provisioning(false);
                }
            }
        })
    }
}
