//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the provisioned transport to its address
//! - Start serving on a background task
//! - Schedule the deferred provisioning call
//! - Initialize collaborators
//!
//! # Design Decisions
//! - Fail fast: a bind error is fatal and nothing else is started
//! - Background work starts only after a successful bind

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use crate::config::IngressConfig;
use crate::lifecycle::collaborators::{Collaborators, NoCollaborators};
use crate::lifecycle::provisioning::ProvisioningCall;
use crate::net::{ListenerError, ListenerState, Transport};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Server stopped: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Server task ended abnormally: {0}")]
    Join(#[from] JoinError),
}

/// Brings the process up: bind, serve, then deferred side effects.
pub struct StartupSequencer {
    config: Arc<IngressConfig>,
    client: reqwest::Client,
    collaborators: Arc<dyn Collaborators>,
    service_name: Option<String>,
}

impl StartupSequencer {
    pub fn new(config: Arc<IngressConfig>, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            collaborators: Arc::new(NoCollaborators),
            service_name: None,
        }
    }

    pub fn with_collaborators(mut self, collaborators: Arc<dyn Collaborators>) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Service name for the provisioning call; none skips the call.
    pub fn with_service_name(mut self, service_name: Option<String>) -> Self {
        self.service_name = service_name;
        self
    }

    /// Bind and start serving `transport`.
    pub async fn start(self, transport: Transport) -> Result<RunningServer, StartupError> {
        let (state_tx, state_rx) = watch::channel(ListenerState::Unbound);
        let kind = transport.kind();

        state_tx.send_replace(ListenerState::Binding);
        let listener = match transport.bind().await {
            Ok(listener) => listener,
            Err(e) => {
                state_tx.send_replace(ListenerState::Failed);
                tracing::error!(error = %e, "Listener failed");
                return Err(e.into());
            }
        };
        state_tx.send_replace(ListenerState::Bound);

        let local_addr = listener.local_addr();
        tracing::info!(
            address = %local_addr,
            "{} - ON: {}",
            kind.as_str().to_uppercase(),
            local_addr.port()
        );

        let server = tokio::spawn(async move {
            let result = transport.serve(listener).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Listener failed");
                state_tx.send_replace(ListenerState::Failed);
            }
            result
        });

        let provisioning = ProvisioningCall::from_config(&self.config, self.service_name)
            .map(|call| call.schedule(self.client.clone()));
        if provisioning.is_none() {
            tracing::debug!("No service name; provisioning call skipped");
        }

        self.collaborators.load_instances();
        self.collaborators.attach_realtime(local_addr);
        if self.config.rabbitmq.enabled {
            self.collaborators.attach_queue();
        }

        Ok(RunningServer {
            local_addr,
            state: state_rx,
            server,
            provisioning,
        })
    }
}

/// Handle to a bound, serving process.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    state: watch::Receiver<ListenerState>,
    server: JoinHandle<Result<(), std::io::Error>>,
    provisioning: Option<JoinHandle<()>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ListenerState {
        *self.state.borrow()
    }

    /// Take the handle of the deferred provisioning task, if one was scheduled.
    pub fn take_provisioning(&mut self) -> Option<JoinHandle<()>> {
        self.provisioning.take()
    }

    /// Wait until the server stops.
    pub async fn wait(self) -> Result<(), StartupError> {
        self.server.await?.map_err(StartupError::Serve)
    }

    /// Stop serving. Used by tests; the process itself never unbinds.
    pub fn abort(&self) {
        self.server.abort();
    }
}
