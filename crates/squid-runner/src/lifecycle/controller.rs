//! High-level orchestration for daemon lifecycle commands.
//!
//! Start and stop are both "invoke, then watch the filesystem": the daemon's
//! exit status is only advisory, and the poller decides success. Status is a
//! pure read.

use std::io::Write;

use squid_runner_config::{Config, InstanceName, InstancePaths};
use tracing::{debug, info};

use super::LIFECYCLE_TARGET;
use super::error::LifecycleError;
use super::pid::read_pid;
use super::poller::{Clock, LivenessPoller, Presence, SystemClock};
use super::probe::{FilesystemProbe, SystemProbe};
use super::runner::{CommandRunner, DaemonInvocation, SystemCommandRunner};
use super::types::{
    DaemonState, LifecycleCommand, LifecycleContext, LifecycleInvocation, LifecycleOutcome,
    LifecycleOutput,
};

/// Production lifecycle handler.
#[derive(Debug, Default)]
pub struct SystemLifecycle;

impl SystemLifecycle {
    pub fn handle<W: Write, E: Write>(
        &mut self,
        invocation: LifecycleInvocation,
        context: LifecycleContext<'_>,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<LifecycleOutcome, LifecycleError> {
        LifecycleController::system(context.config, &invocation.instance)
            .handle(invocation.command, output)
    }
}

/// Drives one instance through start, stop and status.
#[derive(Debug)]
pub struct LifecycleController<P, R, C> {
    paths: InstancePaths,
    daemon_binary: String,
    timeout_ticks: u64,
    probe: P,
    runner: R,
    clock: C,
}

impl LifecycleController<SystemProbe, SystemCommandRunner, SystemClock> {
    /// Controller wired to real stat calls, child processes and sleeps.
    #[must_use]
    pub fn system(config: &Config, instance: &InstanceName) -> Self {
        Self::new(
            config,
            instance,
            SystemProbe::new(config.stat_errors()),
            SystemCommandRunner,
            SystemClock,
        )
    }
}

impl<P: FilesystemProbe, R: CommandRunner, C: Clock> LifecycleController<P, R, C> {
    pub fn new(config: &Config, instance: &InstanceName, probe: P, runner: R, clock: C) -> Self {
        Self {
            paths: InstancePaths::derive(config, instance),
            daemon_binary: config.daemon_binary().to_owned(),
            timeout_ticks: config.timeout_seconds(),
            probe,
            runner,
            clock,
        }
    }

    #[must_use]
    pub const fn paths(&self) -> &InstancePaths {
        &self.paths
    }

    pub fn handle<W: Write, E: Write>(
        &self,
        command: LifecycleCommand,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<LifecycleOutcome, LifecycleError> {
        match command {
            LifecycleCommand::Start => self
                .start(output)
                .map(|waited| LifecycleOutcome::Started { waited }),
            LifecycleCommand::Stop => self.stop(output),
            LifecycleCommand::Status => self.status(output).map(LifecycleOutcome::Status),
        }
    }

    /// Launches the daemon and waits for its PID file to appear.
    ///
    /// Returns the number of ticks spent waiting.
    pub fn start<W: Write, E: Write>(
        &self,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<u64, LifecycleError> {
        self.ensure_configuration()?;
        let invocation = DaemonInvocation::launch(&self.daemon_binary, self.paths.config_path());
        self.invoke(&invocation, output)?;
        let waited = self.poller().wait_for(
            self.paths.pid_path().as_std_path(),
            Presence::Present,
            output,
        )?;
        info!(
            target: LIFECYCLE_TARGET,
            pid_file = %self.paths.pid_path(),
            waited,
            "daemon started"
        );
        Ok(waited)
    }

    /// Asks the daemon to shut down and waits for its process to vanish.
    ///
    /// Only a missing PID file counts as already stopped. A PID file with
    /// unusable content still gets a shutdown request.
    pub fn stop<W: Write, E: Write>(
        &self,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<LifecycleOutcome, LifecycleError> {
        self.ensure_configuration()?;
        let pid_path = self.paths.pid_path();
        if !self.probe.exists(pid_path.as_std_path()) {
            info!(
                target: LIFECYCLE_TARGET,
                pid_file = %pid_path,
                "no pid file; daemon already stopped"
            );
            return Ok(LifecycleOutcome::AlreadyStopped);
        }
        let pid = self.recorded_pid(output)?;
        let invocation = DaemonInvocation::shutdown(&self.daemon_binary, self.paths.config_path());
        self.invoke(&invocation, output)?;
        // Without a usable PID there is no status entry to watch.
        let waited = match pid {
            Some(pid) => {
                let status_path = self.paths.process_status_path(pid);
                self.poller()
                    .wait_for(status_path.as_std_path(), Presence::Absent, output)?
            }
            None => 0,
        };
        info!(target: LIFECYCLE_TARGET, ?pid, waited, "daemon stopped");
        Ok(LifecycleOutcome::Stopped { pid, waited })
    }

    /// Reports whether the recorded PID is alive.
    pub fn status<W: Write, E: Write>(
        &self,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<DaemonState, LifecycleError> {
        let state = match self.recorded_pid(output)? {
            Some(pid) if self.probe.exists(self.paths.process_status_path(pid).as_std_path()) => {
                DaemonState::Running { pid }
            }
            _ => DaemonState::Stopped,
        };
        Ok(state)
    }

    fn poller(&self) -> LivenessPoller<&P, &C> {
        LivenessPoller::new(&self.probe, &self.clock, self.timeout_ticks)
    }

    fn ensure_configuration(&self) -> Result<(), LifecycleError> {
        let path = self.paths.config_path();
        if self.probe.exists(path.as_std_path()) {
            return Ok(());
        }
        Err(LifecycleError::MissingConfiguration {
            path: path.as_std_path().to_path_buf(),
        })
    }

    /// Runs a daemon command, reporting failures without aborting.
    ///
    /// A launch that fails here is detected later by the poller timing out.
    fn invoke<W: Write, E: Write>(
        &self,
        invocation: &DaemonInvocation,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<(), LifecycleError> {
        if let Err(error) = self.runner.run(invocation) {
            debug!(
                target: LIFECYCLE_TARGET,
                command = %invocation,
                %error,
                "daemon command failed"
            );
            output.stderr_line(format_args!("{error}"))?;
        }
        Ok(())
    }

    /// Reads the recorded PID.
    ///
    /// An unreadable or malformed PID file is reported and treated as "no
    /// PID".
    fn recorded_pid<W: Write, E: Write>(
        &self,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<Option<u32>, LifecycleError> {
        match read_pid(self.paths.pid_path().as_std_path()) {
            Ok(pid) => Ok(pid),
            Err(error) => {
                debug!(target: LIFECYCLE_TARGET, %error, "ignoring unusable pid file");
                output.stderr_line(format_args!("{error}"))?;
                Ok(None)
            }
        }
    }
}
