//! Error types for daemon lifecycle operations.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::poller::Presence;

/// Errors raised while executing lifecycle commands.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("configuration file missing: {path:?}")]
    MissingConfiguration { path: PathBuf },
    #[error("failed to spawn daemon binary '{binary:?}': {source}")]
    LaunchDaemon {
        binary: OsString,
        #[source]
        source: io::Error,
    },
    #[error("'{invocation}' exited unsuccessfully (status: {exit_status:?})")]
    DaemonExit {
        invocation: String,
        exit_status: Option<i32>,
    },
    #[error(
        "timed out after {timeout_secs} seconds waiting for {path:?} to become {target}; verify rights/permissions/sudo"
    )]
    WaitTimeout {
        path: PathBuf,
        target: Presence,
        timeout_secs: u64,
    },
    #[error("failed to read pid file {path:?}: {source}")]
    ReadPid {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse pid file {path:?}: {source}")]
    ParsePid {
        path: PathBuf,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to write lifecycle output: {0}")]
    Io(#[source] io::Error),
}
