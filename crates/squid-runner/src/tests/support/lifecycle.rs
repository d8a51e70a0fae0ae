//! Lifecycle test doubles and fixtures.
//!
//! Provides a scripted filesystem probe, an instant clock and a recorder for
//! lifecycle invocations so the poller, controller and dispatcher can be
//! exercised without real daemons or real time.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use camino::Utf8PathBuf;
use rstest::fixture;
use squid_runner_config::{Config, InstanceName};
use tempfile::TempDir;

use crate::lifecycle::{
    Clock, FilesystemProbe, LifecycleCommand, LifecycleContext, LifecycleError,
    LifecycleInvocation, LifecycleOutcome, LifecycleOutput,
};

/// Probe that answers from per-path existence timelines.
///
/// Each probe of a path consumes the next scripted answer; the final answer
/// repeats forever. Unscripted paths never exist.
#[derive(Debug, Default)]
pub(crate) struct ScriptedProbe {
    timelines: RefCell<HashMap<PathBuf, VecDeque<bool>>>,
    probes: RefCell<Vec<PathBuf>>,
}

impl ScriptedProbe {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Scripts the answers returned for successive probes of `path`.
    pub(crate) fn with_timeline(
        self,
        path: impl Into<PathBuf>,
        timeline: impl IntoIterator<Item = bool>,
    ) -> Self {
        self.timelines
            .borrow_mut()
            .insert(path.into(), timeline.into_iter().collect());
        self
    }

    /// Scripts a path whose existence never changes.
    pub(crate) fn with_fixed(self, path: impl Into<PathBuf>, exists: bool) -> Self {
        self.with_timeline(path, [exists])
    }

    /// Number of times `path` has been probed.
    pub(crate) fn probe_count(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.probes
            .borrow()
            .iter()
            .filter(|probed| probed.as_path() == path)
            .count()
    }
}

impl FilesystemProbe for ScriptedProbe {
    fn exists(&self, path: &Path) -> bool {
        self.probes.borrow_mut().push(path.to_path_buf());
        let mut timelines = self.timelines.borrow_mut();
        let Some(timeline) = timelines.get_mut(path) else {
            return false;
        };
        if timeline.len() > 1 {
            return timeline.pop_front().unwrap_or(false);
        }
        timeline.front().copied().unwrap_or(false)
    }
}

/// Clock that returns immediately and records how long it was asked to sleep.
#[derive(Debug, Default)]
pub(crate) struct FakeClock {
    sleeps: Cell<u64>,
    slept: Cell<Duration>,
}

impl FakeClock {
    pub(crate) fn sleeps(&self) -> u64 {
        self.sleeps.get()
    }

    pub(crate) fn slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for FakeClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.slept.set(self.slept.get() + duration);
    }
}

/// Captures lifecycle invocations and replays queued results for dispatcher tests.
#[derive(Default)]
pub(crate) struct TestLifecycle {
    calls: RefCell<Vec<LifecycleCall>>,
    responses: RefCell<VecDeque<Result<LifecycleOutcome, LifecycleError>>>,
    ticks: Cell<u64>,
}

/// A recorded lifecycle command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LifecycleCall {
    pub command: LifecycleCommand,
    pub instance: InstanceName,
}

impl TestLifecycle {
    /// Returns all recorded lifecycle calls.
    pub fn record(&self) -> Vec<LifecycleCall> {
        self.calls.borrow().clone()
    }

    /// Enqueues a result to be returned by the next `handle` call.
    pub fn enqueue(&self, result: Result<LifecycleOutcome, LifecycleError>) {
        self.responses.borrow_mut().push_back(result);
    }

    /// Emits `ticks` progress indicators on every subsequent call.
    pub fn with_progress(self, ticks: u64) -> Self {
        self.ticks.set(ticks);
        self
    }

    /// Handles a lifecycle invocation, recording it and returning a queued result.
    pub fn handle<W: Write, E: Write>(
        &self,
        invocation: LifecycleInvocation,
        _context: LifecycleContext<'_>,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<LifecycleOutcome, LifecycleError> {
        for _ in 0..self.ticks.get() {
            output.progress_tick()?;
        }
        self.calls.borrow_mut().push(LifecycleCall {
            command: invocation.command,
            instance: invocation.instance,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(LifecycleOutcome::AlreadyStopped))
    }
}

// ── Fixtures ───────────────────────────────────────────────────────────────────

/// Temporary filesystem roots standing in for `/etc/<component>`, `/var/run`
/// and `/proc`.
pub(crate) struct FakeRoots {
    _dir: TempDir,
    pub config: Config,
}

impl FakeRoots {
    fn utf8(path: PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path).expect("temp paths are UTF-8")
    }

    /// Writes `<config_dir>/<instance>.conf`.
    pub fn write_configuration(&self, instance: &str) -> Utf8PathBuf {
        let path = self.config.config_dir().join(format!("{instance}.conf"));
        fs::write(&path, "http_port 3128\n").expect("write configuration");
        path
    }

    /// Writes `<run_dir>/<instance>.pid`.
    pub fn write_pid(&self, instance: &str, content: &str) -> Utf8PathBuf {
        let path = self.config.run_dir().join(format!("{instance}.pid"));
        fs::write(&path, content).expect("write pid file");
        path
    }

    /// Creates `<proc_dir>/<pid>/status`.
    pub fn spawn_process_entry(&self, pid: u32) -> Utf8PathBuf {
        let dir = self.config.proc_dir().join(pid.to_string());
        fs::create_dir_all(&dir).expect("create process directory");
        let path = dir.join("status");
        fs::write(&path, "State:\tS (sleeping)\n").expect("write status entry");
        path
    }
}

/// Creates empty configuration, run and proc roots inside a temporary directory.
#[fixture]
pub(crate) fn fake_roots() -> FakeRoots {
    let dir = TempDir::new().expect("temp dir");
    let root = FakeRoots::utf8(dir.path().to_path_buf());
    for child in ["etc", "run", "proc"] {
        fs::create_dir_all(root.join(child)).expect("create fake root");
    }
    let config = Config {
        config_dir: Some(root.join("etc")),
        run_dir: root.join("run"),
        proc_dir: root.join("proc"),
        timeout_seconds: 3,
        ..Config::default()
    };
    FakeRoots { _dir: dir, config }
}

/// Sanitises `raw` into an instance name.
pub(crate) fn instance(raw: &str) -> InstanceName {
    InstanceName::sanitise(raw).expect("instance name")
}
