//! Lifecycle command types and output abstractions.
//!
//! Defines the payloads and IO wrappers shared across lifecycle commands so the
//! controller can remain agnostic of concrete writers.

use std::fmt;
use std::io::Write;

use squid_runner_config::{Config, InstanceName};
use strum::{Display, EnumString};

use super::LifecycleError;

/// Supported lifecycle commands.
///
/// Parsing is case-insensitive so `START`, `Start` and `start` are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LifecycleCommand {
    Start,
    Stop,
    Status,
}

impl LifecycleCommand {
    /// Header printed before the command's progress and verdict.
    #[must_use]
    pub const fn banner(self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Status => "Status",
        }
    }
}

/// Invocation payload forwarded from the CLI runtime.
#[derive(Debug, Clone)]
pub struct LifecycleInvocation {
    pub command: LifecycleCommand,
    pub instance: InstanceName,
}

/// Shared configuration context available to lifecycle handlers.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleContext<'a> {
    pub config: &'a Config,
}

/// Output handle abstracting over stdout/stderr writers.
///
/// Progress ticks go to stdout only when `show_progress` is set; JSON output
/// mode disables them so stdout carries a single document.
pub struct LifecycleOutput<W: Write, E: Write> {
    pub stdout: W,
    pub stderr: E,
    show_progress: bool,
}

impl<W: Write, E: Write> LifecycleOutput<W, E> {
    pub fn new(stdout: W, stderr: E) -> Self {
        Self {
            stdout,
            stderr,
            show_progress: true,
        }
    }

    #[must_use]
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn progress_tick(&mut self) -> Result<(), LifecycleError> {
        if !self.show_progress {
            return Ok(());
        }
        self.stdout.write_all(b".").map_err(LifecycleError::Io)?;
        self.stdout.flush().map_err(LifecycleError::Io)
    }

    pub fn stderr_line(&mut self, args: fmt::Arguments<'_>) -> Result<(), LifecycleError> {
        self.stderr.write_fmt(args).map_err(LifecycleError::Io)?;
        self.stderr.write_all(b"\n").map_err(LifecycleError::Io)?;
        self.stderr.flush().map_err(LifecycleError::Io)
    }
}

/// Observed run state reported by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    /// The process status entry for `pid` exists.
    Running { pid: u32 },
    /// No PID resolved, or its status entry is gone.
    Stopped,
}

/// Successful result of a lifecycle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The PID file appeared after `waited` ticks.
    Started { waited: u64 },
    /// The status entry for `pid` disappeared after `waited` ticks. `pid` is
    /// `None` when the PID file held no usable PID.
    Stopped { pid: Option<u32>, waited: u64 },
    /// No PID file was found, so nothing had to be stopped.
    AlreadyStopped,
    /// Result of a status query.
    Status(DaemonState),
}
