//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use squid_runner_config::InstanceNameError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("unsupported command: {command}")]
    UnsupportedCommand { command: String },
    #[error(transparent)]
    InvalidInstance(#[from] InstanceNameError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to serialise command report: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write command output: {0}")]
    EmitOutput(io::Error),
}
