//! Lifecycle management for the supervised daemon.
//!
//! This module is split into focused submodules so each concern remains small and
//! testable:
//! - [`types`] defines the user-facing command models and IO helpers.
//! - [`error`] captures the error surface exposed to the CLI.
//! - [`probe`] answers filesystem existence questions.
//! - [`poller`] waits for a path to appear or disappear within a tick budget.
//! - [`runner`] invokes the daemon-control binary.
//! - [`pid`] reads the daemon's PID file.
//! - [`controller`] implements the high-level start/stop/status flows.

mod controller;
#[cfg(test)]
mod controller_tests;
mod error;
mod pid;
mod poller;
mod probe;
mod runner;
mod types;

/// Tracing target for lifecycle events.
pub(crate) const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

pub use controller::{LifecycleController, SystemLifecycle};
pub use error::LifecycleError;
pub use poller::{Clock, LivenessPoller, Presence, SystemClock, TICK};
pub use probe::{FilesystemProbe, SystemProbe};
pub use runner::{CommandRunner, DaemonInvocation, SystemCommandRunner};
pub use types::{
    DaemonState, LifecycleCommand, LifecycleContext, LifecycleInvocation, LifecycleOutcome,
    LifecycleOutput,
};
