//! Human-readable banner and verdict.

use std::io::{self, Write};

use squid_runner_config::InstanceName;

use crate::lifecycle::{DaemonState, LifecycleCommand, LifecycleError, LifecycleOutcome};

const GREEN_BOLD: &str = "\x1b[32;1m";
const RED_BOLD: &str = "\x1b[31;1m";
const RESET: &str = "\x1b[0m";

/// Final word printed after the progress dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Ok,
    Failure,
    Running,
    Stopped,
}

impl Verdict {
    pub(crate) fn from_result(result: &Result<LifecycleOutcome, LifecycleError>) -> Self {
        match result {
            Ok(LifecycleOutcome::Status(DaemonState::Running { .. })) => Self::Running,
            Ok(LifecycleOutcome::Status(DaemonState::Stopped)) => Self::Stopped,
            Ok(_) => Self::Ok,
            Err(_) => Self::Failure,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Failure => "FAILURE",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
        }
    }

    const fn colour(self) -> &'static str {
        match self {
            Self::Ok | Self::Running => GREEN_BOLD,
            Self::Failure | Self::Stopped => RED_BOLD,
        }
    }
}

/// Writes `<Banner>: <instance>` without a trailing newline.
pub(crate) fn write_header<W: Write>(
    stdout: &mut W,
    command: LifecycleCommand,
    instance: &InstanceName,
) -> io::Result<()> {
    write!(stdout, "{}: {instance}", command.banner())?;
    stdout.flush()
}

/// Writes the coloured verdict and terminates the line.
pub(crate) fn write_verdict<W: Write>(stdout: &mut W, verdict: Verdict) -> io::Result<()> {
    writeln!(stdout, "{} [{}]{RESET}", verdict.colour(), verdict.label())?;
    stdout.flush()
}
