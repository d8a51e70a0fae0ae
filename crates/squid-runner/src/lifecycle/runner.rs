//! Invocation of the external daemon-control binary.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::{Command, Stdio};

use camino::Utf8Path;
use tracing::debug;

use super::LIFECYCLE_TARGET;
use super::error::LifecycleError;

/// Command line handed to the daemon binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonInvocation {
    binary: OsString,
    arguments: Vec<OsString>,
}

impl DaemonInvocation {
    /// `<binary> -f <config>`: launch the daemon in the background.
    pub fn launch(binary: impl Into<OsString>, config_path: &Utf8Path) -> Self {
        Self {
            binary: binary.into(),
            arguments: vec![OsString::from("-f"), OsString::from(config_path.as_str())],
        }
    }

    /// `<binary> -k shutdown -f <config>`: ask the daemon to stop gracefully.
    pub fn shutdown(binary: impl Into<OsString>, config_path: &Utf8Path) -> Self {
        Self {
            binary: binary.into(),
            arguments: vec![
                OsString::from("-k"),
                OsString::from("shutdown"),
                OsString::from("-f"),
                OsString::from(config_path.as_str()),
            ],
        }
    }

    #[must_use]
    pub fn binary(&self) -> &OsStr {
        &self.binary
    }

    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }
}

impl fmt::Display for DaemonInvocation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.binary.to_string_lossy())?;
        for argument in &self.arguments {
            write!(formatter, " {}", argument.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs daemon-control commands.
pub trait CommandRunner {
    fn run(&self, invocation: &DaemonInvocation) -> Result<(), LifecycleError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &DaemonInvocation) -> Result<(), LifecycleError> {
        (**self).run(invocation)
    }
}

/// Runs the command to completion as a child process.
///
/// Stdin and stdout are detached; stderr is inherited so the daemon's own
/// complaints reach the operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &DaemonInvocation) -> Result<(), LifecycleError> {
        debug!(target: LIFECYCLE_TARGET, command = %invocation, "running daemon command");
        let status = Command::new(invocation.binary())
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LifecycleError::LaunchDaemon {
                binary: invocation.binary().to_os_string(),
                source,
            })?;
        if status.success() {
            return Ok(());
        }
        Err(LifecycleError::DaemonExit {
            invocation: invocation.to_string(),
            exit_status: status.code(),
        })
    }
}
