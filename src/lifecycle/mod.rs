//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Transport → bind → serve on a task
//!         → collaborators.rs (instances, realtime, queue if enabled)
//!         → provisioning.rs (one delayed POST, detached)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then transport, then bind
//! - Bind failure is fatal and starts nothing else
//! - Deferred work never blocks or fails the running server

pub mod collaborators;
pub mod provisioning;
pub mod startup;

pub use collaborators::{Collaborators, NoCollaborators};
pub use provisioning::{service_name_from_env, ProvisioningCall};
pub use startup::{RunningServer, StartupError, StartupSequencer};
