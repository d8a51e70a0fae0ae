//! Machine-readable command report.

use std::io::Write;

use serde::Serialize;
use squid_runner_config::InstanceName;

use crate::AppError;
use crate::lifecycle::{DaemonState, LifecycleCommand, LifecycleError, LifecycleOutcome};

/// Outcome tag carried by a [`CommandReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ReportOutcome {
    Started,
    Stopped,
    AlreadyStopped,
    Running,
    NotRunning,
    Failed,
}

/// One JSON document describing a finished lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CommandReport {
    pub(crate) instance: String,
    pub(crate) command: String,
    pub(crate) outcome: ReportOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) waited_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl CommandReport {
    pub(crate) fn new(
        instance: &InstanceName,
        command: LifecycleCommand,
        result: &Result<LifecycleOutcome, LifecycleError>,
    ) -> Self {
        let mut report = Self {
            instance: instance.to_string(),
            command: command.to_string(),
            outcome: ReportOutcome::Failed,
            pid: None,
            waited_seconds: None,
            error: None,
        };
        match result {
            Ok(LifecycleOutcome::Started { waited }) => {
                report.outcome = ReportOutcome::Started;
                report.waited_seconds = Some(*waited);
            }
            Ok(LifecycleOutcome::Stopped { pid, waited }) => {
                report.outcome = ReportOutcome::Stopped;
                report.pid = *pid;
                report.waited_seconds = Some(*waited);
            }
            Ok(LifecycleOutcome::AlreadyStopped) => report.outcome = ReportOutcome::AlreadyStopped,
            Ok(LifecycleOutcome::Status(DaemonState::Running { pid })) => {
                report.outcome = ReportOutcome::Running;
                report.pid = Some(*pid);
            }
            Ok(LifecycleOutcome::Status(DaemonState::Stopped)) => {
                report.outcome = ReportOutcome::NotRunning;
            }
            Err(error) => report.error = Some(error.to_string()),
        }
        report
    }
}

/// Writes `report` as a single line of JSON.
pub(crate) fn write_report<W: Write>(stdout: &mut W, report: &CommandReport) -> Result<(), AppError> {
    serde_json::to_writer(&mut *stdout, report).map_err(AppError::SerialiseReport)?;
    stdout.write_all(b"\n").map_err(AppError::EmitOutput)?;
    stdout.flush().map_err(AppError::EmitOutput)
}
