//! Hooks into subsystems that live outside the ingress (instance loading,
//! realtime channel, message queue). The startup sequencer calls them once
//! after the listener binds; what they do is their own business.

use std::net::SocketAddr;

pub trait Collaborators: Send + Sync {
    /// Load persisted instances.
    fn load_instances(&self) {}

    /// Attach the realtime channel to the running server.
    fn attach_realtime(&self, _local_addr: SocketAddr) {}

    /// Attach the message queue. Only called when it is enabled.
    fn attach_queue(&self) {}
}

/// No collaborators.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollaborators;

impl Collaborators for NoCollaborators {}
